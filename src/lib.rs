//! Commerce platform: API gateway plus inventory and orders services.
//!
//! The gateway routes each request by mount point (`/inventory`, `/orders`)
//! to a backend base URL, forwards method, headers and body, and relays the
//! backend's status, headers and body unchanged.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod security;
pub mod services;

pub use config::PlatformConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use proxy::{ProxyEngine, ProxyError};
pub use routing::DispatchTable;
