//! Accept loop for the decoy.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Spawn one task per connection running the `ConnectionHandler`
//! - Apply the optional per-connection deadline
//! - Stop accepting on shutdown and drain in-flight connections

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::Instrument;

use crate::config::ServiceConfig;
use crate::lifecycle::ShutdownSignal;
use crate::http::{ConnectionHandler, ServiceContext};
use crate::net::{ConnectionPermit, ConnectionTracker, Listener, ListenerError};
use crate::routing::RouteTable;
use crate::triggers::TriggerSink;

/// The decoy HTTP service.
pub struct DecoyServer {
    config: Arc<ServiceConfig>,
    handler: ConnectionHandler,
    tracker: ConnectionTracker,
}

impl DecoyServer {
    /// Create a server with the given configuration, routes and trigger sink.
    pub fn new(config: ServiceConfig, routes: RouteTable, sink: Arc<dyn TriggerSink>) -> Self {
        let config = Arc::new(config);
        let handler = ConnectionHandler::new(Arc::clone(&config), Arc::new(routes), sink);
        Self {
            config,
            handler,
            tracker: ConnectionTracker::new(),
        }
    }

    pub fn handler(&self) -> &ConnectionHandler {
        &self.handler
    }

    /// Tracker of live connections, shared with spawned tasks.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept connections until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(
            address = %addr,
            banner = %self.config.banner,
            routes = self.handler.routes().len(),
            "Decoy server starting"
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => self.spawn_connection(stream, peer, permit),
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        let drain = Duration::from_secs(self.config.timeouts.drain_secs);
        if self.tracker.drain(drain).await {
            tracing::info!("Decoy server stopped");
        } else {
            tracing::warn!(
                remaining = self.tracker.active_count(),
                "Drain deadline passed with connections still open"
            );
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr, permit: ConnectionPermit) {
        let guard = self.tracker.track();
        let ctx = ServiceContext::for_session(Arc::clone(&self.config), guard.session(), Some(peer));
        let handler = self.handler.clone();
        let deadline = match self.config.timeouts.read_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        metrics::counter!("decoy_connections_total").increment(1);
        let span = tracing::info_span!("connection", session = %ctx.session, peer = %peer);

        tokio::spawn(
            async move {
                let _permit = permit;
                let _guard = guard;

                let result = match deadline {
                    Some(deadline) => {
                        match tokio::time::timeout(deadline, handler.handle(stream, &ctx)).await {
                            Ok(result) => result,
                            Err(_) => {
                                tracing::warn!(?deadline, "Connection deadline elapsed");
                                return;
                            }
                        }
                    }
                    None => handler.handle(stream, &ctx).await,
                };

                match result {
                    Ok(disposition) => tracing::debug!(?disposition, "Connection handled"),
                    Err(e) => tracing::warn!(error = %e, "Connection failed"),
                }
            }
            .instrument(span),
        );
    }
}
