//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the decoy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the decoy service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address (IP only, e.g. "0.0.0.0").
    pub address: String,

    /// Bind port.
    pub port: u16,

    /// Value of the `Server` response header.
    pub banner: String,

    /// Append `Connection: close` to every response.
    pub close_connection: bool,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Longest request line accepted before the request is treated as malformed.
    pub max_line_bytes: usize,

    /// Route definitions.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8888,
            banner: "HTTPStatic".to_string(),
            close_connection: true,
            max_connections: 1024,
            max_line_bytes: 64 * 1024,
            routes: Vec::new(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// The `address:port` pair the listener binds to.
    pub fn bind_address(&self) -> String {
        if self.address.contains(':') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

/// A single path served by the decoy.
///
/// Exactly one of `content`, `file` or `generator` must be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Request path, matched exactly.
    pub path: String,

    /// Inline response body.
    #[serde(default)]
    pub content: Option<String>,

    /// File whose contents become the response body (read once at startup).
    #[serde(default)]
    pub file: Option<String>,

    /// Name of a built-in content generator evaluated per request.
    #[serde(default)]
    pub generator: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for handling one connection, in seconds. 0 disables it.
    pub read_secs: u64,

    /// How long shutdown waits for in-flight connections, in seconds.
    pub drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 0,
            drain_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
