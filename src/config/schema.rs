//! Configuration schema definitions.
//!
//! One document configures all three processes. Each binary reads the
//! section it owns; `observability` is shared.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the platform.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Gateway process settings.
    pub gateway: GatewayConfig,

    /// Inventory service settings.
    pub inventory: ServiceConfig,

    /// Orders service settings.
    pub orders: ServiceConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            inventory: ServiceConfig::on("0.0.0.0:8081"),
            orders: ServiceConfig::on("0.0.0.0:8082"),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Mount points, checked in definition order.
    pub routes: Vec<RouteConfig>,

    /// Outbound timeouts.
    pub timeouts: TimeoutConfig,

    /// Optional resource caps.
    pub limits: LimitsConfig,

    /// Header forwarding policy.
    pub forwarding: ForwardingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            routes: vec![
                RouteConfig::new("inventory", "/inventory", "http://127.0.0.1:8081"),
                RouteConfig::new("orders", "/orders", "http://127.0.0.1:8082/orders"),
            ],
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            forwarding: ForwardingConfig::default(),
        }
    }
}

/// A mount point mapped to a backend base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path prefix, e.g. "/inventory". No trailing slash.
    pub mount: String,

    /// Base URL the remainder path is appended to.
    pub backend_url: String,
}

impl RouteConfig {
    pub fn new(
        name: impl Into<String>,
        mount: impl Into<String>,
        backend_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mount: mount.into(),
            backend_url: backend_url.into(),
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Whole exchange with the backend (send, head, body) in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 2,
            upstream_secs: 10,
        }
    }
}

/// Resource caps. Unset means unbounded.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound request body size in bytes.
    pub max_body_bytes: Option<usize>,

    /// Maximum requests processed at once; extra requests wait for a slot.
    pub max_concurrent_requests: Option<usize>,
}

/// Header forwarding policy.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Remove hop-by-hop headers in both directions.
    pub strip_hop_by_hop: bool,
}

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl ServiceConfig {
    pub fn on(bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint (gateway only).
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
