//! Backend services owned by the platform.
//!
//! # Data Flow
//! ```text
//! Gateway (proxied request)
//!     → inventory.rs / orders.rs (axum handlers)
//!     → store.rs (in-memory document collections)
//!     → error.rs (ServiceError → status + {"error": ...})
//! ```
//!
//! # Design Decisions
//! - Each service is its own process with its own router
//! - Every response is JSON and carries a Content-Type header
//! - State is injected through axum `State`, never global

pub mod error;
pub mod inventory;
pub mod orders;
pub mod store;

use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::http::instrument;
use crate::lifecycle::Draining;

/// Liveness probe shared by both services.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve a service router until `shutdown` fires.
pub async fn serve(
    name: &'static str,
    router: Router,
    listener: TcpListener,
    shutdown: Draining,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(service = name, address = %addr, "Service listening");

    axum::serve(listener, instrument(router))
        .with_graceful_shutdown(async move {
            shutdown.wait().await;
            tracing::info!(service = name, "Service draining connections");
        })
        .await?;

    tracing::info!(service = name, "Service stopped");
    Ok(())
}
