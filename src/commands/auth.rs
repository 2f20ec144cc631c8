//! Username/password login and self-registration against the `usuarios`
//! collection. Credentials travel and rest in plain text, same as the store
//! they live in; the returned [`AuthUser`] never carries the password.

use crate::error::StoreError;
use crate::models::{AuthUser, User};
use crate::store::{StoreClient, USERS};
use serde_json::json;

pub async fn login(store: &StoreClient, username: &str, password: &str) -> Result<AuthUser, StoreError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(StoreError::validation("Usuario y contraseña son obligatorios"));
    }

    let matches: Vec<User> = store.query(USERS, "username", username).await?;
    let Some(user) = matches.into_iter().next() else {
        return Err(StoreError::NotFound {
            resource: USERS,
            id: username.to_string(),
        });
    };

    if user.password != password {
        return Err(StoreError::validation("Contraseña incorrecta"));
    }

    tracing::info!(username = %user.username, role = %user.role, "login accepted");
    Ok(AuthUser {
        username: user.username,
        role: user.role,
    })
}

/// New accounts always get the `user` role; admins are seeded directly in
/// the store.
pub async fn register(store: &StoreClient, username: &str, password: &str) -> Result<AuthUser, StoreError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(StoreError::validation("Usuario y contraseña son obligatorios"));
    }

    let existing: Vec<User> = store.query(USERS, "username", username).await?;
    if !existing.is_empty() {
        return Err(StoreError::validation("El nombre de usuario ya está en uso"));
    }

    let created: User = store
        .create(
            USERS,
            &json!({
                "username": username,
                "password": password,
                "role": "user",
            }),
        )
        .await?;

    tracing::info!(username = %created.username, "account registered");
    Ok(AuthUser {
        username: created.username,
        role: created.role,
    })
}
