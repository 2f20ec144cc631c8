//! Service ticket lifecycle: intake, edits, delivery, deletion, and the
//! client ↔ service id linkage the store does not enforce on its own.
//!
//! Creating and deleting a service each take two sequential writes (the
//! service itself, then the owner's id list). The gap between them is not
//! transactional; a failure after the first write leaves an unlinked record
//! and is accepted rather than compensated.

use crate::error::StoreError;
use crate::models::{now_timestamp, parse_timestamp, Budget, Client, CreateService, Service, ServiceStatus};
use crate::store::{StoreClient, CLIENTS, SERVICES};
use crate::whatsapp::{pickup_message, WhatsAppClient};
use serde_json::json;
use std::cmp::Reverse;
use tracing::{error, info, warn};

pub async fn get_services(store: &StoreClient) -> Result<Vec<Service>, StoreError> {
    store.list(SERVICES).await
}

pub async fn get_service(store: &StoreClient, id: &str) -> Result<Service, StoreError> {
    store.get(SERVICES, id).await
}

/// Registers a new service and appends its id to the owning client's list.
pub async fn create_service(store: &StoreClient, new: CreateService) -> Result<Service, StoreError> {
    if new.client_id.trim().is_empty() {
        return Err(StoreError::validation("a client must be selected"));
    }
    if new.product_brand.trim().is_empty() {
        return Err(StoreError::validation("product brand is required"));
    }

    let mut new = new;
    new.budget = Budget::from_items(new.budget.items);

    let service: Service = store.create(SERVICES, &new).await?;
    info!(service_id = %service.id, client_id = %service.client_id, "service created");

    let owner: Client = store.get(CLIENTS, &service.client_id).await?;
    let mut service_ids = owner.service_ids;
    service_ids.push(service.id.clone());

    let _: Client = store
        .patch(CLIENTS, &owner.id, &json!({ "serviciosRealizados": service_ids }))
        .await?;
    info!(service_id = %service.id, client_id = %owner.id, "service linked to client");

    Ok(service)
}

/// Saves a full edit of a service. The budget is recomputed from its line
/// items before persisting, and a transition into delivered stamps the exit
/// timestamp if none exists yet.
pub async fn update_service(store: &StoreClient, service: &Service) -> Result<Service, StoreError> {
    let mut edited = service.clone();
    edited.budget = Budget::from_items(edited.budget.items);
    stamp_exit_on_delivery(&mut edited);

    store.patch(SERVICES, &edited.id, &edited).await
}

/// Sets just the status. On delivery the exit timestamp is stamped once; on
/// ready-for-pickup the client is notified through the relay when one is
/// configured. A failed notification is logged and dropped; the status
/// change stands.
pub async fn set_status(
    store: &StoreClient,
    relay: Option<&WhatsAppClient>,
    id: &str,
    status: ServiceStatus,
) -> Result<Service, StoreError> {
    let mut service: Service = store.get(SERVICES, id).await?;
    service.status = status;
    stamp_exit_on_delivery(&mut service);

    let body = json!({ "estado": service.status, "fechaSalida": service.exit_date });
    let updated: Service = store.patch(SERVICES, id, &body).await?;
    info!(service_id = %id, status = %updated.status.as_str(), "service status updated");

    if updated.status == ServiceStatus::ReadyForPickup {
        if let Some(relay) = relay {
            notify_ready_for_pickup(store, relay, &updated).await;
        }
    }

    Ok(updated)
}

/// Marks a service delivered (the work panel's check action). The record
/// moves from the active panel to the history views on the next fetch.
pub async fn deliver_service(store: &StoreClient, id: &str) -> Result<Service, StoreError> {
    set_status(store, None, id, ServiceStatus::Delivered).await
}

/// Deletes a service, unlinking it from its owner first. A missing owner is
/// tolerated: the service may already be an orphan.
pub async fn delete_service(store: &StoreClient, id: &str) -> Result<(), StoreError> {
    let service: Service = store.get(SERVICES, id).await?;

    match store.get::<Client>(CLIENTS, &service.client_id).await {
        Ok(owner) => {
            let service_ids: Vec<String> = owner
                .service_ids
                .into_iter()
                .filter(|service_id| service_id != id)
                .collect();
            let _: Client = store
                .patch(CLIENTS, &owner.id, &json!({ "serviciosRealizados": service_ids }))
                .await?;
            info!(service_id = %id, client_id = %owner.id, "service unlinked from client");
        }
        Err(StoreError::NotFound { .. }) => {
            warn!(service_id = %id, client_id = %service.client_id, "owner not found, deleting orphan service");
        }
        Err(e) => return Err(e),
    }

    store.delete(SERVICES, id).await
}

/// Work panel view: not yet delivered and no exit date, newest intake first.
pub fn active_services(services: &[Service]) -> Vec<&Service> {
    let mut active: Vec<&Service> = services
        .iter()
        .filter(|service| service.exit_date.is_none() && service.status != ServiceStatus::Delivered)
        .collect();
    active.sort_by_key(|service| Reverse(parse_timestamp(&service.entry_date)));
    active
}

/// History view: delivered services that carry an exit date.
pub fn delivered_services(services: &[Service]) -> Vec<&Service> {
    services
        .iter()
        .filter(|service| service.status == ServiceStatus::Delivered && service.exit_date.is_some())
        .collect()
}

/// Case-insensitive match on id, brand, category, or the owner's name.
pub fn search_services<'a>(services: &'a [Service], clients: &[Client], query: &str) -> Vec<&'a Service> {
    let query = query.to_lowercase();
    services
        .iter()
        .filter(|service| {
            let owner_name = clients
                .iter()
                .find(|client| client.id == service.client_id)
                .map(|client| client.full_name.to_lowercase())
                .unwrap_or_default();
            service.id.to_lowercase().contains(&query)
                || service.product_brand.to_lowercase().contains(&query)
                || service.category.as_str().contains(&query)
                || owner_name.contains(&query)
        })
        .collect()
}

/// Stamps the exit timestamp the first time a service reaches delivered.
/// An already-set exit date is never overwritten.
pub fn stamp_exit_on_delivery(service: &mut Service) {
    if service.status == ServiceStatus::Delivered && service.exit_date.is_none() {
        service.exit_date = Some(now_timestamp());
    }
}

async fn notify_ready_for_pickup(store: &StoreClient, relay: &WhatsAppClient, service: &Service) {
    let owner = match store.get::<Client>(CLIENTS, &service.client_id).await {
        Ok(owner) => owner,
        Err(e) => {
            error!(service_id = %service.id, error = %e, "cannot notify: owner lookup failed");
            return;
        }
    };

    let message = pickup_message(&owner.full_name, &service.product_brand, &service.id);
    if let Err(e) = relay.send_text(&owner.phone, &message).await {
        error!(service_id = %service.id, error = %e, "pickup notification failed");
    }
}
