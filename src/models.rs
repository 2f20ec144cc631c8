use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Workflow status of a service order.
///
/// The store holds the five canonical values below, in workshop order, plus a
/// handful of workflow-only strings written by other tooling ("diagnostico",
/// "presupuestoPendiente", ...). Those deserialize into `Extended` instead of
/// failing, and round-trip unchanged. The ordering is display grouping only;
/// any status may be set from any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Pending,
    InReview,
    RepairInProgress,
    ReadyForPickup,
    Delivered,
    Extended(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceStatus::Pending => "pendiente",
            ServiceStatus::InReview => "enRevision",
            ServiceStatus::RepairInProgress => "revisionTerminada",
            ServiceStatus::ReadyForPickup => "terminado",
            ServiceStatus::Delivered => "entregado",
            ServiceStatus::Extended(raw) => raw,
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "pendiente" => ServiceStatus::Pending,
            "enRevision" => ServiceStatus::InReview,
            "revisionTerminada" => ServiceStatus::RepairInProgress,
            "terminado" => ServiceStatus::ReadyForPickup,
            "entregado" => ServiceStatus::Delivered,
            other => ServiceStatus::Extended(other.to_string()),
        }
    }

    /// Admin-facing label, as shown on the service cards.
    pub fn label(&self) -> &str {
        match self {
            ServiceStatus::Pending => "Pendiente",
            ServiceStatus::InReview => "En Revisión",
            ServiceStatus::RepairInProgress => "En Reparación",
            ServiceStatus::ReadyForPickup => "Listo para Entrega",
            ServiceStatus::Delivered => "Entregado",
            ServiceStatus::Extended(raw) => raw,
        }
    }
}

impl Serialize for ServiceStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ServiceStatus::from_wire(&raw))
    }
}

/// Kind of equipment a service order covers. Unrecognized wire values fold
/// into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    Phones,
    Computers,
    Speakers,
    Other,
}

impl ServiceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::Phones => "celulares",
            ServiceCategory::Computers => "computadora",
            ServiceCategory::Speakers => "parlantes",
            ServiceCategory::Other => "otros",
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "celulares" => ServiceCategory::Phones,
            "computadora" => ServiceCategory::Computers,
            "parlantes" => ServiceCategory::Speakers,
            _ => ServiceCategory::Other,
        }
    }
}

impl Serialize for ServiceCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ServiceCategory::from_wire(&raw))
    }
}

/// Storefront catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductCategory {
    Phones,
    Computers,
    Accessories,
    Other,
}

impl ProductCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Phones => "celulares",
            ProductCategory::Computers => "computadoras",
            ProductCategory::Accessories => "accesorios",
            ProductCategory::Other => "otros",
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "celulares" => ProductCategory::Phones,
            "computadoras" => ProductCategory::Computers,
            "accesorios" => ProductCategory::Accessories,
            _ => ProductCategory::Other,
        }
    }
}

impl Serialize for ProductCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ProductCategory::from_wire(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,
    #[serde(rename = "celular")]
    pub phone: String,
    #[serde(rename = "correo", default)]
    pub email: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    /// Back-references to owned service ids. The store enforces nothing here;
    /// the service commands keep it in sync on create/delete.
    #[serde(rename = "serviciosRealizados", default)]
    pub service_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,
    #[serde(rename = "celular")]
    pub phone: String,
    #[serde(rename = "correo", default)]
    pub email: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "serviciosRealizados", default)]
    pub service_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "costo")]
    pub cost: f64,
}

impl BudgetItem {
    pub fn new(description: impl Into<String>, cost: f64) -> Self {
        BudgetItem {
            description: description.into(),
            cost,
        }
    }
}

/// Itemized cost estimate. `subtotal` and `total` are always derived from the
/// items; `iva` stays 0 (no tax modeled) but is kept on the wire because the
/// store records it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub items: Vec<BudgetItem>,
    pub subtotal: f64,
    #[serde(default)]
    pub iva: f64,
    pub total: f64,
}

impl Budget {
    pub fn empty() -> Self {
        Budget::from_items(Vec::new())
    }

    pub fn from_items(items: Vec<BudgetItem>) -> Self {
        let mut budget = Budget {
            items,
            subtotal: 0.0,
            iva: 0.0,
            total: 0.0,
        };
        budget.recompute();
        budget
    }

    pub fn add_item(&mut self, item: BudgetItem) {
        self.items.push(item);
        self.recompute();
    }

    /// Replaces the item at `index`. Out-of-range indexes are ignored.
    pub fn update_item(&mut self, index: usize, item: BudgetItem) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = item;
        }
        self.recompute();
    }

    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.subtotal = self.items.iter().map(|item| item.cost).sum();
        self.iva = 0.0;
        self.total = self.subtotal;
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(rename = "clienteId")]
    pub client_id: String,
    #[serde(rename = "marcaProducto")]
    pub product_brand: String,
    #[serde(rename = "tipoServicio")]
    pub category: ServiceCategory,
    #[serde(rename = "detalles", default)]
    pub details: String,
    #[serde(rename = "estado")]
    pub status: ServiceStatus,
    #[serde(rename = "presupuesto", default)]
    pub budget: Budget,
    /// Intake date. Either a bare `YYYY-MM-DD` from the intake form or a full
    /// RFC 3339 timestamp; see [`parse_timestamp`].
    #[serde(rename = "fechaEntrada")]
    pub entry_date: String,
    #[serde(rename = "fechaSalida", default)]
    pub exit_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    #[serde(rename = "clienteId")]
    pub client_id: String,
    #[serde(rename = "marcaProducto")]
    pub product_brand: String,
    #[serde(rename = "tipoServicio")]
    pub category: ServiceCategory,
    #[serde(rename = "detalles", default)]
    pub details: String,
    #[serde(rename = "estado")]
    pub status: ServiceStatus,
    #[serde(rename = "presupuesto", default)]
    pub budget: Budget,
    #[serde(rename = "fechaEntrada")]
    pub entry_date: String,
    #[serde(rename = "fechaSalida", default)]
    pub exit_date: Option<String>,
}

impl CreateService {
    /// Blank intake form: pending, empty budget, entry dated today.
    pub fn intake(
        client_id: impl Into<String>,
        product_brand: impl Into<String>,
        category: ServiceCategory,
    ) -> Self {
        CreateService {
            client_id: client_id.into(),
            product_brand: product_brand.into(),
            category,
            details: String::new(),
            status: ServiceStatus::Pending,
            budget: Budget::empty(),
            entry_date: today(),
            exit_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: ProductCategory,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "imagen", default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: ProductCategory,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "imagen", default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// What the UI keeps after a successful login. The password never leaves the
/// auth module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

/// Parses the store's mixed timestamp formats: full RFC 3339 strings written
/// by delivery stamping, or bare `YYYY-MM-DD` dates from intake forms (read
/// as midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Current instant in the store's timestamp format (RFC 3339, millisecond
/// precision).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Today as a bare date, the intake form default.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
