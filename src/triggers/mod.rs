//! Trigger sinks.
//!
//! # Data Flow
//! ```text
//! ConnectionHandler
//!     → Observation { RawLine | PathObserved }
//!     → TriggerSink::observe (fire-and-forget)
//!     → detection engine (outside this crate)
//! ```
//!
//! # Design Decisions
//! - `observe` is infallible; a sink that cannot deliver drops the event
//! - Sinks are shared across connection tasks, hence `Send + Sync`
//! - Ordering is only guaranteed within one session

pub mod sink;

pub use sink::{ChannelSink, FanoutSink, TracingSink};

use std::net::SocketAddr;

use crate::net::SessionId;

/// What kind of request feature was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationKind {
    /// One raw line of the request head, terminator included.
    RawLine,
    /// The path token of the request line.
    PathObserved,
}

impl ObservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationKind::RawLine => "raw_line",
            ObservationKind::PathObserved => "path",
        }
    }
}

/// A single request feature reported to the trigger subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub session: SessionId,
    pub peer: Option<SocketAddr>,
    pub kind: ObservationKind,
    pub value: String,
}

/// Receiver of observations produced by connection handlers.
pub trait TriggerSink: Send + Sync {
    fn observe(&self, observation: Observation);
}
