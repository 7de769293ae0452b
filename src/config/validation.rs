//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate mount points and backend URLs
//! - Validate value ranges (timeouts > 0, limits > 0, addresses parse)
//! - Detect duplicate mount points
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlatformConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{GatewayConfig, PlatformConfig, RouteConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    BindAddress { field: &'static str, value: String },

    #[error("route {route:?}: mount {mount:?} must start with '/'")]
    MountNotAbsolute { route: String, mount: String },

    #[error("route {route:?}: mount {mount:?} must not end with '/'")]
    MountTrailingSlash { route: String, mount: String },

    #[error("route {route:?}: mount {mount:?} is already used by an earlier route")]
    DuplicateMount { route: String, mount: String },

    #[error("route {route:?}: backend_url {url:?} is invalid: {reason}")]
    BackendUrl {
        route: String,
        url: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Validate the whole platform configuration.
pub fn validate_config(config: &PlatformConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind_address("gateway.bind_address", &config.gateway.bind_address, &mut errors);
    check_bind_address("inventory.bind_address", &config.inventory.bind_address, &mut errors);
    check_bind_address("orders.bind_address", &config.orders.bind_address, &mut errors);
    check_gateway(&config.gateway, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_bind_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_gateway(gateway: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for route in &gateway.routes {
        check_mount(route, errors);
        if !seen.insert(route.mount.as_str()) {
            errors.push(ValidationError::DuplicateMount {
                route: route.name.clone(),
                mount: route.mount.clone(),
            });
        }
        if let Err(reason) = check_backend_url(&route.backend_url) {
            errors.push(ValidationError::BackendUrl {
                route: route.name.clone(),
                url: route.backend_url.clone(),
                reason,
            });
        }
    }

    if gateway.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero { field: "gateway.timeouts.connect_secs" });
    }
    if gateway.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero { field: "gateway.timeouts.upstream_secs" });
    }
    if gateway.limits.max_body_bytes == Some(0) {
        errors.push(ValidationError::Zero { field: "gateway.limits.max_body_bytes" });
    }
    if gateway.limits.max_concurrent_requests == Some(0) {
        errors.push(ValidationError::Zero { field: "gateway.limits.max_concurrent_requests" });
    }
}

fn check_mount(route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if !route.mount.starts_with('/') {
        errors.push(ValidationError::MountNotAbsolute {
            route: route.name.clone(),
            mount: route.mount.clone(),
        });
    } else if route.mount.ends_with('/') {
        errors.push(ValidationError::MountTrailingSlash {
            route: route.name.clone(),
            mount: route.mount.clone(),
        });
    }
}

fn check_backend_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(())
}
