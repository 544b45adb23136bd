//! Decoy HTTP responder library.
//!
//! Presents an HTTP/1.1 endpoint that answers from a small static route table,
//! closes every connection after one response, and reports each request line
//! and requested path to a trigger sink.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod triggers;

pub use crate::config::ServiceConfig;
pub use crate::http::{ConnectionHandler, DecoyServer, ServiceContext};
pub use crate::lifecycle::Shutdown;
pub use crate::routing::{RouteContent, RouteTable};
pub use crate::triggers::{Observation, ObservationKind, TriggerSink};
