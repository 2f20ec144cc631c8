//! Outbound WhatsApp relay (Meta Graph API text messages).
//!
//! Fire-and-forget: one POST per notification, no retry and no delivery
//! tracking beyond the HTTP response. A failed send is logged and reported to
//! the caller, but the status change that triggered it stands.

use crate::error::RelayError;
use reqwest::Client;
use serde_json::json;

const DEFAULT_API_URL: &str = "https://graph.facebook.com/v22.0";

#[derive(Clone)]
pub struct WhatsAppClient {
    http: Client,
    api_url: String,
    phone_id: String,
    token: String,
}

impl WhatsAppClient {
    /// Reads `WHATSAPP_PHONE_ID` and `WHATSAPP_TOKEN`; the relay is the only
    /// credentialed integration, so these are the crate's only required env.
    pub fn from_env() -> Result<Self, RelayError> {
        let phone_id = std::env::var("WHATSAPP_PHONE_ID").map_err(|_| RelayError::MissingCredentials)?;
        let token = std::env::var("WHATSAPP_TOKEN").map_err(|_| RelayError::MissingCredentials)?;
        Ok(WhatsAppClient::new(phone_id, token))
    }

    #[must_use]
    pub fn new(phone_id: impl Into<String>, token: impl Into<String>) -> Self {
        WhatsAppClient {
            http: Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            phone_id: phone_id.into(),
            token: token.into(),
        }
    }

    /// Points the client at a different relay endpoint. Used by tests.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sends one text message. Non-2xx responses surface the relay's payload
    /// verbatim inside [`RelayError::Rejected`].
    pub async fn send_text(&self, phone: &str, body: &str) -> Result<(), RelayError> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": phone,
            "type": "text",
            "text": { "body": body },
        });

        let response = self
            .http
            .post(format!("{}/{}/messages", self.api_url, self.phone_id))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(to = %phone, "whatsapp message sent");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Message sent when a repair is ready for pickup.
pub fn pickup_message(client_name: &str, product_brand: &str, service_id: &str) -> String {
    format!(
        "Hola {client_name}! Tu equipo {product_brand} ya está listo para retirar. \
         N° de orden: SG-{service_id}. Te esperamos en SG Servicio Técnico."
    )
}
