pub mod auth;
pub mod clients;
pub mod products;
pub mod services;
pub mod stats;
pub mod tracking;
