// armscale-api: Async Rust client for the Azure Resource Manager endpoints
// armscale drives (resource groups, App Service, Azure Monitor autoscale).

pub mod auth;
pub mod client;
pub mod error;
pub mod lro;
pub mod monitor;
pub mod resources;
pub mod transport;
pub mod types;
pub mod web;

pub use auth::{AccessToken, ClientSecretCredential, DEFAULT_AUTHORITY};
pub use client::{ArmClient, DEFAULT_RESOURCE_MANAGER};
pub use error::Error;
pub use lro::PollingConfig;
pub use transport::TransportConfig;
