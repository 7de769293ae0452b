//! Response helpers.
//!
//! # Responsibilities
//! - Map gateway errors to status codes with a JSON payload
//!
//! # Design Decisions
//! - Payload shape `{"error": ..., "kind": ...}` matches the backends' `error` key
//! - Backend responses are relayed untouched and never pass through here

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::proxy::ProxyError;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (self.status(), Json(body)).into_response()
    }
}
