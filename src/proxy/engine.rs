//! Proxy engine: one inbound request in, one backend exchange, one response out.
//!
//! # Responsibilities
//! - Build the outbound request (target URL, method, headers, body)
//! - Execute it over the shared pooled client, bounded by a timeout
//! - Relay status, headers and the buffered body unchanged
//!
//! # Design Decisions
//! - No retries and no idempotence handling; each call is attempted once
//! - Request bodies stream through; response bodies are buffered
//! - No shared mutable state: the client is cheap to clone and internally pooled

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::GatewayConfig;
use crate::proxy::error::{error_chain, exceeds_body_limit, ProxyError};
use crate::routing::Resolved;
use crate::security::headers;

/// Pooled HTTP/1.1 client shared by every request.
pub type HttpClient = Client<HttpConnector, Body>;

/// Executes requests against resolved backends.
#[derive(Clone, Debug)]
pub struct ProxyEngine {
    client: HttpClient,
    upstream_timeout: Duration,
    strip_hop_by_hop: bool,
}

impl ProxyEngine {
    /// Create an engine around an existing transport.
    pub fn new(client: HttpClient, upstream_timeout: Duration, strip_hop_by_hop: bool) -> Self {
        Self {
            client,
            upstream_timeout,
            strip_hop_by_hop,
        }
    }

    /// Create an engine with a fresh pooled client from gateway settings.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self::new(
            client,
            Duration::from_secs(config.timeouts.upstream_secs),
            config.forwarding.strip_hop_by_hop,
        )
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    /// Forward `request` to the backend chosen by `resolved` and relay the result.
    pub async fn forward(
        &self,
        request: Request<Body>,
        resolved: &Resolved<'_>,
    ) -> Result<Response<Body>, ProxyError> {
        let outbound = self.outbound_request(request, resolved)?;
        let target = outbound.uri().to_string();

        tracing::debug!(
            route = %resolved.route(),
            method = %outbound.method(),
            target = %target,
            "Forwarding request"
        );

        let exchange = async {
            let response = self.client.request(outbound).await.map_err(|e| {
                if exceeds_body_limit(&e) {
                    ProxyError::PayloadTooLarge {
                        target: target.clone(),
                    }
                } else {
                    ProxyError::BackendUnreachable {
                        target: target.clone(),
                        reason: error_chain(&e),
                    }
                }
            })?;

            let (parts, body) = response.into_parts();
            let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
                .await
                .map_err(|e| ProxyError::ResponseBody {
                    target: target.clone(),
                    reason: error_chain(&e),
                })?;
            Ok::<_, ProxyError>((parts, bytes))
        };

        let outcome = tokio::time::timeout(self.upstream_timeout, exchange).await;
        let (mut parts, bytes) = match outcome {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProxyError::BackendTimeout {
                    target,
                    timeout: self.upstream_timeout,
                })
            }
        };

        if self.strip_hop_by_hop {
            headers::strip_hop_by_hop_headers(&mut parts.headers);
        }
        headers::reset_buffered_framing(&mut parts.headers);

        tracing::debug!(
            route = %resolved.route(),
            target = %target,
            status = %parts.status,
            bytes = bytes.len(),
            "Backend responded"
        );

        Ok(Response::from_parts(parts, Body::from(bytes)))
    }

    /// Derive the outbound request: target = backend URL + remainder (+ query).
    pub fn outbound_request(
        &self,
        request: Request<Body>,
        resolved: &Resolved<'_>,
    ) -> Result<Request<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let target = target_url(resolved, parts.uri.query());

        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(target.as_str())
            .body(body)
            .map_err(|e| ProxyError::OutboundConstruction {
                reason: error_chain(&e),
                target,
            })?;

        *outbound.headers_mut() =
            headers::forward_request_headers(&parts.headers, self.strip_hop_by_hop);
        Ok(outbound)
    }
}

/// Literal concatenation; the query string is carried over untouched.
pub fn target_url(resolved: &Resolved<'_>, query: Option<&str>) -> String {
    let mut target = String::with_capacity(
        resolved.backend_url().len() + resolved.remainder.len() + query.map_or(0, |q| q.len() + 1),
    );
    target.push_str(resolved.backend_url());
    target.push_str(resolved.remainder);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{DispatchRule, DispatchTable};
    use axum::http::{header, Method};

    fn engine(strip: bool) -> ProxyEngine {
        let mut config = GatewayConfig::default();
        config.forwarding.strip_hop_by_hop = strip;
        ProxyEngine::from_config(&config)
    }

    fn table() -> DispatchTable {
        DispatchTable::new(vec![
            DispatchRule::new("inventory", "/inventory", "http://127.0.0.1:8081"),
            DispatchRule::new("orders", "/orders", "http://127.0.0.1:8082/orders"),
            DispatchRule::new("broken", "/broken", "http://bad host"),
        ])
    }

    #[tokio::test]
    async fn builds_target_from_remainder_and_query() {
        let table = table();
        let resolved = table.resolve("/inventory/products").unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri("/inventory/products?category=books&page=2")
            .header(header::HOST, "gateway.local")
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap();

        let outbound = engine(false).outbound_request(request, &resolved).unwrap();

        assert_eq!(
            outbound.uri().to_string(),
            "http://127.0.0.1:8081/products?category=books&page=2"
        );
        assert_eq!(outbound.method(), Method::GET);
        assert!(outbound.headers().get(header::HOST).is_none());
        assert_eq!(outbound.headers().get("x-request-id").unwrap(), "abc");
    }

    #[tokio::test]
    async fn exact_mount_maps_to_backend_base() {
        let table = table();
        let resolved = table.resolve("/orders").unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"products":{"sku1":2}}"#))
            .unwrap();

        let outbound = engine(false).outbound_request(request, &resolved).unwrap();

        assert_eq!(outbound.uri().to_string(), "http://127.0.0.1:8082/orders");
        assert_eq!(outbound.method(), Method::POST);
        assert_eq!(
            outbound.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(outbound.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"products":{"sku1":2}}"#);
    }

    #[tokio::test]
    async fn invalid_target_is_a_construction_error() {
        let table = table();
        let resolved = table.resolve("/broken/x").unwrap();
        let request = Request::builder().uri("/broken/x").body(Body::empty()).unwrap();

        let err = engine(false).outbound_request(request, &resolved).unwrap_err();

        assert_eq!(err.kind(), "outbound_construction");
        assert_eq!(err.target(), Some("http://bad host/x"));
    }

    #[tokio::test]
    async fn strips_hop_by_hop_when_enabled() {
        let table = table();
        let resolved = table.resolve("/inventory/").unwrap();
        let request = Request::builder()
            .uri("/inventory/")
            .header(header::CONNECTION, "close")
            .header(header::UPGRADE, "websocket")
            .header("x-custom", "kept")
            .body(Body::empty())
            .unwrap();

        let outbound = engine(true).outbound_request(request, &resolved).unwrap();

        assert_eq!(outbound.uri().to_string(), "http://127.0.0.1:8081/");
        assert!(outbound.headers().get(header::CONNECTION).is_none());
        assert!(outbound.headers().get(header::UPGRADE).is_none());
        assert_eq!(outbound.headers().get("x-custom").unwrap(), "kept");
    }

    #[tokio::test]
    async fn unreachable_backend_is_reported() {
        // Reserve a port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let table = DispatchTable::new(vec![DispatchRule::new(
            "inventory",
            "/inventory",
            format!("http://{addr}"),
        )]);
        let resolved = table.resolve("/inventory/products").unwrap();
        let request = Request::builder()
            .uri("/inventory/products")
            .body(Body::empty())
            .unwrap();

        let err = engine(false).forward(request, &resolved).await.unwrap_err();

        assert_eq!(err.kind(), "backend_unreachable");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
