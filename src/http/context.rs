//! Per-connection context handed to dynamic routes.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::net::SessionId;

/// What a content generator can see about the service and the connection.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub config: Arc<ServiceConfig>,
    pub session: SessionId,
    pub peer: Option<SocketAddr>,
}

impl ServiceContext {
    /// Context for a fresh session.
    pub fn new(config: Arc<ServiceConfig>, peer: Option<SocketAddr>) -> Self {
        Self::for_session(config, SessionId::new(), peer)
    }

    /// Context for a session whose ID was assigned by the accept layer.
    pub fn for_session(config: Arc<ServiceConfig>, session: SessionId, peer: Option<SocketAddr>) -> Self {
        Self {
            config,
            session,
            peer,
        }
    }
}
