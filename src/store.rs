//! Generic client for the JSON resource store.
//!
//! The back office persists nothing locally; every screen talks to the same
//! json-server style store exposing collection endpoints per resource
//! (`clientes`, `servicios`, `productos`, `usuarios`). This module is the one
//! place that knows HTTP; the command modules only see typed results.

use crate::error::StoreError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const CLIENTS: &str = "clientes";
pub const SERVICES: &str = "servicios";
pub const PRODUCTS: &str = "productos";
pub const USERS: &str = "usuarios";

const DEFAULT_STORE_URL: &str = "http://localhost:3001";

/// Handle to the resource store, shared by every command. Cloning is cheap
/// (reqwest clients share their connection pool).
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
}

impl StoreClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        StoreClient {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Store URL from `STORE_URL`, falling back to the local dev server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("STORE_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string());
        StoreClient::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /{resource}`: full collection.
    pub async fn list<T: DeserializeOwned>(&self, resource: &'static str) -> Result<Vec<T>, StoreError> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, resource))
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::read_json(resource, None, response).await
    }

    /// `GET /{resource}/{id}`: 404 maps to [`StoreError::NotFound`].
    pub async fn get<T: DeserializeOwned>(&self, resource: &'static str, id: &str) -> Result<T, StoreError> {
        let response = self
            .http
            .get(format!("{}/{}/{}", self.base_url, resource, id))
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::read_json(resource, Some(id), response).await
    }

    /// `GET /{resource}?{field}={value}`: json-server field filter.
    pub async fn query<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, resource))
            .query(&[(field, value)])
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::read_json(resource, None, response).await
    }

    /// `POST /{resource}`: returns the stored record (with its assigned id).
    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &'static str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, resource))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::read_json(resource, None, response).await
    }

    /// `PATCH /{resource}/{id}`: partial update, returns the merged record.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &'static str,
        id: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .http
            .patch(format!("{}/{}/{}", self.base_url, resource, id))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::read_json(resource, Some(id), response).await
    }

    /// `PUT /{resource}/{id}`: full replacement.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &'static str,
        id: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .http
            .put(format!("{}/{}/{}", self.base_url, resource, id))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::read_json(resource, Some(id), response).await
    }

    /// `DELETE /{resource}/{id}`.
    pub async fn delete(&self, resource: &'static str, id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(format!("{}/{}/{}", self.base_url, resource, id))
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                resource,
                id: id.to_string(),
            }),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(
        resource: &'static str,
        id: Option<&str>,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| StoreError::ParseFailed(e.to_string())),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                resource,
                id: id.unwrap_or_default().to_string(),
            }),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
