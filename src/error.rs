use thiserror::Error;

/// Failures talking to the resource store, plus the client-side checks that
/// run before any request is issued. Every variant is terminal for the action
/// that raised it; nothing retries.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
    #[error("store returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid response body: {0}")]
    ParseFailed(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }
}

/// Failures of the outbound messaging relay. A rejected send carries the
/// relay's opaque response body.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("missing WHATSAPP_PHONE_ID or WHATSAPP_TOKEN in environment")]
    MissingCredentials,
    #[error("relay request failed: {0}")]
    RequestFailed(String),
    #[error("relay returned {status}: {body}")]
    Rejected { status: u16, body: String },
}
