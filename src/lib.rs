pub mod commands;
pub mod error;
pub mod models;
pub mod store;
pub mod whatsapp;


pub use error::{RelayError, StoreError};
pub use models::{
    AuthUser, Budget, BudgetItem, Client, CreateClient, CreateService, NewProduct, Product,
    ProductCategory, Service, ServiceCategory, ServiceStatus, User,
};
pub use store::StoreClient;
pub use whatsapp::WhatsAppClient;

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
