//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path (second token of the request line)
//!     → router.rs (exact lookup)
//!     → RouteContent::Static  → body as-is
//!     → RouteContent::Dynamic → fn(context, request lines) → body
//!     → or RouteNotFound → fixed 404 page
//!
//! Table construction (at startup):
//!     RouteConfig[]
//!     → inline content / file contents / generators.rs
//!     → RouteTable, frozen behind Arc
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - Deterministic: same path always resolves to the same content
//! - Explicit RouteNotFound rather than silent default

pub mod generators;
pub mod router;

pub use router::{DynamicContent, RouteBuildError, RouteContent, RouteNotFound, RouteTable};
