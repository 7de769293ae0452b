//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use commerce_gateway::config::{GatewayConfig, RouteConfig};
use commerce_gateway::{GatewayServer, Shutdown};
use tokio::net::TcpListener;

/// What a mock backend saw.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Recordings = Arc<Mutex<Vec<Recorded>>>;

/// Canned reply of a mock backend.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: &'static str,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: vec![("content-type", "application/json; charset=utf-8")],
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    seen: Recordings,
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.seen.lock().unwrap().push(Recorded {
        method,
        uri,
        headers,
        body,
    });

    tokio::time::sleep(state.reply.delay).await;

    let mut response = (state.reply.status, Body::from(state.reply.body)).into_response();
    for (name, value) in &state.reply.headers {
        response.headers_mut().append(*name, value.parse().unwrap());
    }
    response
}

/// Serve `router` on an ephemeral port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a backend that records every request and answers with `reply`.
pub async fn start_mock_backend(reply: Reply) -> (SocketAddr, Recordings) {
    let seen = Recordings::default();
    let router = Router::new().fallback(record).with_state(MockState {
        reply,
        seen: seen.clone(),
    });
    (spawn_router(router).await, seen)
}

/// An address nothing listens on.
pub fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Gateway config on an ephemeral port with the given routes.
pub fn gateway_config(routes: Vec<RouteConfig>) -> GatewayConfig {
    GatewayConfig {
        bind_address: "127.0.0.1:0".into(),
        routes,
        ..GatewayConfig::default()
    }
}

pub fn route(mount: &str, backend: SocketAddr) -> RouteConfig {
    RouteConfig::new(mount.trim_start_matches('/'), mount, format!("http://{backend}"))
}

/// Running gateway; shuts down on drop.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind(&config.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = GatewayServer::new(&config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
