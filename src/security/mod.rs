//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size, concurrency slot)
//!     → headers.rs (header copy, optional hop-by-hop stripping)
//!     → Pass to proxy engine
//! ```
//!
//! # Design Decisions
//! - Transparent by default: no header rewriting beyond Host
//! - Every hardening step is opt-in through configuration

pub mod headers;
pub mod limits;
