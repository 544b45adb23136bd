//! Decoy HTTP responder.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    DECOY                          │
//!   Client Request    │  ┌──────────┐   ┌────────────┐   ┌───────────┐   │
//!   ──────────────────┼─▶│   net    │──▶│  handler   │──▶│  routing  │   │
//!                     │  │ listener │   │ read head  │   │  table    │   │
//!                     │  └──────────┘   └─────┬──────┘   └─────┬─────┘   │
//!                     │                       │                │         │
//!                     │                       ▼                ▼         │
//!   Client Response   │                 ┌───────────┐   ┌───────────┐    │
//!   ◀─────────────────┼─────────────────│ response  │◀──│  content  │    │
//!   (then close)      │                 │  builder  │   │ static/fn │    │
//!                     │                 └───────────┘   └───────────┘    │
//!                     │                       │                          │
//!                     │                       ▼                          │
//!                     │                 ┌───────────┐                    │
//!                     │                 │ triggers  │──▶ detection engine │
//!                     │                 └───────────┘                    │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use decoy_http::config::{load_config, validation::validate_config, ConfigError, ServiceConfig};
use decoy_http::lifecycle::{self, Shutdown};
use decoy_http::observability;
use decoy_http::triggers::TracingSink;

#[derive(Parser)]
#[command(name = "decoy-http")]
#[command(about = "Decoy HTTP responder that reports what clients ask for", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides the config file.
    #[arg(short, long)]
    address: Option<String>,

    /// Bind port, overrides the config file.
    #[arg(short, long)]
    port: Option<u16>,

    /// `Server` header value, overrides the config file.
    #[arg(short, long)]
    banner: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(banner) = self.banner {
            config.banner = banner;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    observability::logging::init(&config.observability)?;
    tracing::info!("decoy-http v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.bind_address(),
        banner = %config.banner,
        routes = config.routes.len(),
        max_connections = config.max_connections,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    lifecycle::spawn_signal_handler(shutdown);

    lifecycle::run(config, Arc::new(TracingSink), server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
