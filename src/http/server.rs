//! Gateway HTTP server.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all gateway handler
//! - Wire up middleware (request ID, tracing, optional body limit)
//! - Bind server to listener and drain on shutdown
//! - Dispatch requests through the dispatch table
//! - Hand matched requests to the proxy engine

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::GatewayConfig;
use crate::lifecycle::Draining;
use crate::http::request::{instrument, request_id};
use crate::observability::metrics;
use crate::proxy::{ProxyEngine, ProxyError};
use crate::routing::DispatchTable;
use crate::security::limits::ConcurrencyCap;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<DispatchTable>,
    pub engine: ProxyEngine,
    pub concurrency: ConcurrencyCap,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    table: Arc<DispatchTable>,
}

impl GatewayServer {
    /// Create a server with a dispatch table and engine built from configuration.
    pub fn new(config: &GatewayConfig) -> Self {
        let table = DispatchTable::from_config(&config.routes);
        let engine = ProxyEngine::from_config(config);
        Self::with_parts(config, table, engine)
    }

    /// Create a server around an explicit table and engine.
    pub fn with_parts(config: &GatewayConfig, table: DispatchTable, engine: ProxyEngine) -> Self {
        let table = Arc::new(table);
        let state = AppState {
            table: table.clone(),
            engine,
            concurrency: ConcurrencyCap::new(config.limits.max_concurrent_requests),
        };

        let router = Self::build_router(config, state);
        Self { router, table }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state);

        if let Some(max) = config.limits.max_body_bytes {
            router = router.layer(RequestBodyLimitLayer::new(max));
        }

        instrument(router)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Draining,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        for rule in self.table.rules() {
            tracing::info!(
                route = %rule.name(),
                mount = %rule.mount().as_str(),
                backend = %rule.backend_url(),
                "Route registered"
            );
        }
        tracing::info!(address = %addr, "Gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Gateway draining connections");
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Catch-all handler: resolve, then proxy or 404.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request_id(request.headers()).to_owned();

    let Some(resolved) = state.table.resolve(&path) else {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "No route matched"
        );
        metrics::record_request(method.as_str(), 404, "none", start);
        return ProxyError::RouteNotFound { path }.into_response();
    };

    let _slot = state.concurrency.acquire().await;

    match state.engine.forward(request, &resolved).await {
        Ok(response) => {
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                resolved.route(),
                start,
            );
            response
        }
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                route = %resolved.route(),
                target = err.target().unwrap_or("-"),
                kind = err.kind(),
                error = %err,
                "Proxy request failed"
            );
            metrics::record_request(
                method.as_str(),
                err.status().as_u16(),
                resolved.route(),
                start,
            );
            err.into_response()
        }
    }
}
