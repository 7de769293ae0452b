//! Header forwarding policy.
//!
//! # Responsibilities
//! - Copy inbound headers to the outbound request
//! - Optionally strip hop-by-hop headers in both directions
//! - Reset body framing once a response body has been buffered
//!
//! # Design Decisions
//! - Everything is forwarded verbatim by default, hop-by-hop headers included
//! - `Host` is never copied; the transport derives it from the target URL
//! - Multi-valued headers keep every value in order

use axum::http::{header, HeaderMap};

/// Connection-scoped headers (RFC 9110 §7.6.1), plus the legacy ones
/// proxies commonly see.
pub const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Headers for the outbound request.
pub fn forward_request_headers(inbound: &HeaderMap, strip_hop_by_hop: bool) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(header::HOST);
    if strip_hop_by_hop {
        strip_hop_by_hop_headers(&mut headers);
    }
    headers
}

/// Remove hop-by-hop headers and any header named in `Connection`.
pub fn strip_hop_by_hop_headers(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    for name in named {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Drop chunked framing from a response whose body is now a single buffer.
///
/// `Content-Length` is only removed alongside `Transfer-Encoding`; on its own
/// it already describes the buffered body (or the body a HEAD would have had).
pub fn reset_buffered_framing(headers: &mut HeaderMap) {
    if headers.remove(header::TRANSFER_ENCODING).is_some() {
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRAILER);
    }
}
