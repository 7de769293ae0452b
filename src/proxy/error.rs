//! Gateway-local failures.
//!
//! Backend 4xx/5xx responses never become a `ProxyError`; they are relayed
//! as ordinary responses.

use std::time::Duration;

use axum::http::StatusCode;
use http_body_util::LengthLimitError;

/// Failure of a single proxied request. Always terminal for that request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("no route for path {path}")]
    RouteNotFound { path: String },

    #[error("cannot build request to {target}: {reason}")]
    OutboundConstruction { target: String, reason: String },

    #[error("request body for {target} exceeds the configured limit")]
    PayloadTooLarge { target: String },

    #[error("backend {target} unreachable: {reason}")]
    BackendUnreachable { target: String, reason: String },

    #[error("backend {target} did not respond within {}s", .timeout.as_secs_f64())]
    BackendTimeout { target: String, timeout: Duration },

    #[error("backend {target} failed while sending its response body: {reason}")]
    ResponseBody { target: String, reason: String },
}

impl ProxyError {
    /// Status code shown to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::OutboundConstruction { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::BackendUnreachable { .. }
            | ProxyError::BackendTimeout { .. }
            | ProxyError::ResponseBody { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Stable machine-readable label for payloads and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::RouteNotFound { .. } => "route_not_found",
            ProxyError::OutboundConstruction { .. } => "outbound_construction",
            ProxyError::PayloadTooLarge { .. } => "payload_too_large",
            ProxyError::BackendUnreachable { .. } => "backend_unreachable",
            ProxyError::BackendTimeout { .. } => "backend_timeout",
            ProxyError::ResponseBody { .. } => "response_body",
        }
    }

    /// The outbound target, when one was computed.
    pub fn target(&self) -> Option<&str> {
        match self {
            ProxyError::RouteNotFound { .. } => None,
            ProxyError::OutboundConstruction { target, .. }
            | ProxyError::PayloadTooLarge { target }
            | ProxyError::BackendUnreachable { target, .. }
            | ProxyError::BackendTimeout { target, .. }
            | ProxyError::ResponseBody { target, .. } => Some(target),
        }
    }
}

/// Render an error with its whole source chain, e.g.
/// `client error (Connect): tcp connect error: Connection refused`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Whether the inbound body limit tripped somewhere in `err`'s source chain.
///
/// A streamed body without `Content-Length` is only cut off while the
/// transport is already sending it, so the limit surfaces as a client error.
pub fn exceeds_body_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
