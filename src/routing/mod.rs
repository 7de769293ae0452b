//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (mount point match, remainder extraction)
//!     → Return: (rule, remainder) or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → DispatchRule[] (definition order kept)
//!     → Freeze as immutable DispatchTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (definition order)

pub mod matcher;
pub mod router;

pub use matcher::MountPoint;
pub use router::{DispatchRule, DispatchTable, Resolved};
