//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (request ID, tracing span)
//!     → routing (dispatch table lookup)
//!     → proxy (backend exchange)
//!     → response.rs (gateway errors as JSON)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{instrument, request_id, X_REQUEST_ID};
pub use server::{AppState, GatewayServer};
