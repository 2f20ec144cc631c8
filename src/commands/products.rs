use crate::error::StoreError;
use crate::models::{NewProduct, Product};
use crate::store::{StoreClient, PRODUCTS};

/// Stock at or below this count flags a product for restocking. Fixed, not
/// configurable at runtime.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x300/e9ecef/868e96?text=Sin+Imagen";

pub async fn get_products(store: &StoreClient) -> Result<Vec<Product>, StoreError> {
    store.list(PRODUCTS).await
}

pub async fn create_product(store: &StoreClient, product: NewProduct) -> Result<Product, StoreError> {
    validate(&product.name, product.price, product.stock)?;

    // Short ids, like the rest of the catalog.
    let id = uuid::Uuid::new_v4().simple().to_string()[..4].to_string();
    let product = Product {
        id,
        name: product.name,
        category: product.category,
        description: product.description,
        price: product.price,
        stock: product.stock,
        image: default_image(product.image),
    };

    store.create(PRODUCTS, &product).await
}

/// Full replacement, not a merge: the edit form always submits every field.
pub async fn update_product(store: &StoreClient, product: &Product) -> Result<Product, StoreError> {
    validate(&product.name, product.price, product.stock)?;

    let mut product = product.clone();
    product.image = default_image(product.image);
    store.put(PRODUCTS, &product.id, &product).await
}

pub async fn delete_product(store: &StoreClient, id: &str) -> Result<(), StoreError> {
    store.delete(PRODUCTS, id).await
}

pub async fn get_low_stock(store: &StoreClient) -> Result<Vec<Product>, StoreError> {
    let products: Vec<Product> = store.list(PRODUCTS).await?;
    let mut low: Vec<Product> = products
        .into_iter()
        .filter(|product| product.stock <= LOW_STOCK_THRESHOLD)
        .collect();
    low.sort_by_key(|product| product.stock);
    Ok(low)
}

fn validate(name: &str, price: f64, stock: i64) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::validation("product name is required"));
    }
    if price <= 0.0 {
        return Err(StoreError::validation("product price must be greater than zero"));
    }
    if stock < 0 {
        return Err(StoreError::validation("product stock cannot be negative"));
    }
    Ok(())
}

fn default_image(image: String) -> String {
    if image.trim().is_empty() {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        image
    }
}

/// Products needing restocking attention, split into the two alert groups.
/// A product appears in exactly one group.
#[derive(Debug)]
pub struct StockAlerts<'a> {
    /// stock == 0, the critical group.
    pub out_of_stock: Vec<&'a Product>,
    /// 0 < stock <= threshold.
    pub low_stock: Vec<&'a Product>,
}

impl StockAlerts<'_> {
    pub fn total(&self) -> usize {
        self.out_of_stock.len() + self.low_stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub fn stock_alerts(products: &[Product]) -> StockAlerts<'_> {
    StockAlerts {
        out_of_stock: products.iter().filter(|p| p.stock == 0).collect(),
        low_stock: products
            .iter()
            .filter(|p| p.stock > 0 && p.stock <= LOW_STOCK_THRESHOLD)
            .collect(),
    }
}

/// One aggregate sentence counting each alert group, or `None` when all
/// stock levels are fine. The detail view lists the affected products
/// directly from [`StockAlerts`].
pub fn alert_summary(alerts: &StockAlerts<'_>) -> Option<String> {
    let out = alerts.out_of_stock.len();
    let low = alerts.low_stock.len();

    match (out, low) {
        (0, 0) => None,
        (out, 0) => Some(format!(
            "Tienes {out} producto{s} AGOTADO{s}.",
            s = plural(out)
        )),
        (0, low) => Some(format!(
            "Tienes {low} producto{s} con stock BAJO (≤{LOW_STOCK_THRESHOLD}).",
            s = plural(low)
        )),
        (out, low) => Some(format!(
            "Tienes {out} producto{s} AGOTADO{s}. Además, {low} con stock BAJO (≤{LOW_STOCK_THRESHOLD}).",
            s = plural(out)
        )),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
