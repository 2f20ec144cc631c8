use crate::error::StoreError;
use crate::models::{parse_timestamp, Client, CreateClient, Service};
use crate::store::{StoreClient, CLIENTS, SERVICES};
use std::cmp::Reverse;

pub async fn get_clients(store: &StoreClient) -> Result<Vec<Client>, StoreError> {
    store.list(CLIENTS).await
}

pub async fn create_client(store: &StoreClient, client: CreateClient) -> Result<Client, StoreError> {
    if client.full_name.trim().is_empty() {
        return Err(StoreError::validation("client name is required"));
    }
    if client.phone.trim().is_empty() {
        return Err(StoreError::validation("client phone is required"));
    }

    store.create(CLIENTS, &client).await
}

pub async fn update_client(store: &StoreClient, client: &Client) -> Result<Client, StoreError> {
    if client.full_name.trim().is_empty() {
        return Err(StoreError::validation("client name is required"));
    }

    store.patch(CLIENTS, &client.id, client).await
}

/// Removes the client record only. Its services stay in the store as orphans;
/// there is deliberately no cascade.
pub async fn delete_client(store: &StoreClient, id: &str) -> Result<(), StoreError> {
    store.delete(CLIENTS, id).await
}

/// Service history for one client: every service whose id appears in the
/// client's back-reference list, newest intake first. The store has no
/// filtered endpoint for this, so the full collection is fetched and matched
/// locally.
pub async fn get_client_services(store: &StoreClient, client: &Client) -> Result<Vec<Service>, StoreError> {
    if client.service_ids.is_empty() {
        return Ok(Vec::new());
    }

    let all: Vec<Service> = store.list(SERVICES).await?;
    let mut owned: Vec<Service> = all
        .into_iter()
        .filter(|service| client.service_ids.contains(&service.id))
        .collect();
    owned.sort_by_key(|service| Reverse(parse_timestamp(&service.entry_date)));

    Ok(owned)
}
