//! Public order lookup: given a service id, return the order, its owner, and
//! a four-stage progress bar derived from the workflow status. This surface
//! needs no login, so it exposes nothing beyond the one looked-up order.

use crate::error::StoreError;
use crate::models::{Client, Service, ServiceStatus};
use crate::store::{StoreClient, CLIENTS, SERVICES};
use serde::Serialize;

/// Workflow statuses in lifecycle order. Intermediate values such as
/// `diagnostico` only ever appear on the wire; the admin screens write the
/// five canonical ones.
pub const STATUS_ORDER: [&str; 8] = [
    "pendiente",
    "enRevision",
    "diagnostico",
    "presupuestoPendiente",
    "reparacion",
    "revisionTerminada",
    "terminado",
    "entregado",
];

/// The four checkpoints shown on the public page. Each lights up once the
/// order's status reaches its threshold in [`STATUS_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackingStage {
    Received,
    Diagnosis,
    Repair,
    Ready,
}

pub const STAGES: [TrackingStage; 4] = [
    TrackingStage::Received,
    TrackingStage::Diagnosis,
    TrackingStage::Repair,
    TrackingStage::Ready,
];

impl TrackingStage {
    /// Index into [`STATUS_ORDER`] at which this checkpoint activates.
    fn threshold(self) -> usize {
        match self {
            TrackingStage::Received => 0,
            TrackingStage::Diagnosis => 1,
            TrackingStage::Repair => 4,
            TrackingStage::Ready => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackingStage::Received => "Recibido",
            TrackingStage::Diagnosis => "Diagnóstico",
            TrackingStage::Repair => "Reparación",
            TrackingStage::Ready => "Listo Retirar",
        }
    }
}

pub fn status_position(status: &ServiceStatus) -> Option<usize> {
    let wire = status.as_str();
    STATUS_ORDER.iter().position(|candidate| *candidate == wire)
}

/// A status outside [`STATUS_ORDER`] activates no checkpoint at all, so a
/// typo'd or future status renders an all-grey bar instead of a wrong one.
pub fn stage_active(status: &ServiceStatus, stage: TrackingStage) -> bool {
    status_position(status).is_some_and(|position| position >= stage.threshold())
}

pub fn active_stages(status: &ServiceStatus) -> [bool; 4] {
    let mut active = [false; 4];
    for (slot, stage) in active.iter_mut().zip(STAGES) {
        *slot = stage_active(status, stage);
    }
    active
}

/// Customer-facing wording for each workflow status. Unknown statuses fall
/// back to the raw wire value rather than hiding the order.
pub fn status_description(status: &ServiceStatus) -> &str {
    match status.as_str() {
        "pendiente" => "Equipo Recibido (Esperando ser Revisado)",
        "enRevision" => "En Revisión Inicial / Diagnóstico",
        "diagnostico" => "Diagnóstico Finalizado / Presupuesto Generado",
        "presupuestoPendiente" => "Presupuesto Generado (Esperando Aprobación del Cliente)",
        "reparacion" => "En Proceso de Reparación Activa",
        "revisionTerminada" => "En Reparación",
        "terminado" => "Listo para Retirar",
        "entregado" => "Servicio Entregado y Cerrado",
        raw => raw,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub service: Service,
    /// `None` when the owning client record is missing or unreadable; the
    /// page still renders the order itself.
    pub client: Option<Client>,
    pub stages: [bool; 4],
}

pub async fn track_service(store: &StoreClient, service_id: &str) -> Result<TrackingView, StoreError> {
    let service: Service = store.get(SERVICES, service_id).await?;
    let client: Option<Client> = store.get(CLIENTS, &service.client_id).await.ok();
    let stages = active_stages(&service.status);
    Ok(TrackingView {
        service,
        client,
        stages,
    })
}
