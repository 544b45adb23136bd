//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table from validated configuration
//! - Bind the listener
//! - Run the server until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Routes are built before binding (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::http::DecoyServer;
use crate::lifecycle::ShutdownSignal;
use crate::net::{Listener, ListenerError};
use crate::routing::{RouteBuildError, RouteTable};
use crate::triggers::TriggerSink;

/// Error raised while bringing the service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build routes: {0}")]
    Routes(#[from] RouteBuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// A server with its listener already bound.
pub struct Prepared {
    pub server: DecoyServer,
    pub listener: Listener,
}

/// Build routes and bind the listener for `config`.
pub async fn prepare(
    config: ServiceConfig,
    sink: Arc<dyn TriggerSink>,
) -> Result<Prepared, StartupError> {
    let routes = RouteTable::from_config(&config.routes)?;
    let listener = Listener::bind(&config).await?;
    let server = DecoyServer::new(config, routes, sink);
    Ok(Prepared { server, listener })
}

/// Prepare and run the service until `shutdown` fires.
pub async fn run(
    config: ServiceConfig,
    sink: Arc<dyn TriggerSink>,
    shutdown: ShutdownSignal,
) -> Result<(), StartupError> {
    let Prepared { server, listener } = prepare(config, sink).await?;
    server.run(listener, shutdown).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::triggers::TracingSink;

    #[tokio::test]
    async fn prepare_binds_ephemeral_port() {
        let config = ServiceConfig {
            address: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        let prepared = prepare(config, Arc::new(TracingSink)).await.unwrap();
        assert_ne!(prepared.listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn bad_route_fails_before_binding() {
        let mut config = ServiceConfig {
            address: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        config.routes.push(RouteConfig {
            path: "/".into(),
            file: Some("/nonexistent/index.html".into()),
            ..Default::default()
        });

        assert!(matches!(
            prepare(config, Arc::new(TracingSink)).await,
            Err(StartupError::Routes(_))
        ));
    }
}
