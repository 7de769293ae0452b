//! Proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request + Resolved (rule, remainder)
//!     → engine.rs (build outbound, execute, buffer response)
//!     → Response relayed verbatim, or
//!     → error.rs (ProxyError → status + JSON payload)
//! ```

pub mod engine;
pub mod error;

pub use engine::{HttpClient, ProxyEngine};
pub use error::ProxyError;
