//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PlatformConfig (validated, immutable)
//!     → each binary takes the section it owns
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the dispatch table never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    ForwardingConfig, GatewayConfig, LimitsConfig, ObservabilityConfig, PlatformConfig,
    RouteConfig, ServiceConfig, TimeoutConfig,
};
