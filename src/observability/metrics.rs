//! Metrics collection and exposition.
//!
//! # Metrics
//! - `decoy_connections_total` (counter): accepted connections
//! - `decoy_responses_total` (counter): responses by status
//! - `decoy_observations_total` (counter): trigger observations by kind
//! - `decoy_active_connections` (gauge): current connection count
//!
//! # Design Decisions
//! - Metrics are recorded through the `metrics` facade; without an installed
//!   recorder they cost nothing
//! - The Prometheus exporter serves its own HTTP listener, separate from the decoy

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!("decoy_connections_total", "Accepted connections");
    ::metrics::describe_counter!("decoy_responses_total", "Responses sent, by status");
    ::metrics::describe_counter!("decoy_observations_total", "Observations sent to the trigger sink");
    ::metrics::describe_gauge!("decoy_active_connections", "Connections currently being handled");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}
