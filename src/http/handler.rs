//! Per-connection request handling.
//!
//! # Data Flow
//! ```text
//! READING_HEAD  read lines until CRLF or EOF, report each as RawLine
//!     → DISPATCHING  extract path, report PathObserved, resolve route
//!     → RESPONDING   200 / 404 / 500, always text/html
//!     → CLOSED       stream shut down, no further I/O
//! ```
//!
//! # Design Decisions
//! - Peer mistakes never escape as errors: malformed heads get 500, unknown
//!   paths get 404
//! - A peer that sent nothing at all gets no response
//! - One request per connection; the connection is never kept alive

use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::ServiceConfig;
use crate::http::request::{read_head, RequestHead};
use crate::http::response::{ResponseBuilder, TEXT_HTML};
use crate::http::{HttpError, ServiceContext};
use crate::routing::RouteTable;
use crate::triggers::{Observation, ObservationKind, TriggerSink};

/// Body of every 404 response.
pub const NOT_FOUND_PAGE: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Page not found</title></head><body><h1>404 Not Found!</h1></body></html>";

/// Body of every 500 response.
pub const ERROR_BODY: &str = "Error!";

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A response with this status was written before closing.
    Responded(u16),
    /// The peer sent nothing; the connection was closed silently.
    ClosedWithoutResponse,
}

struct Reply<'a> {
    status: u16,
    body: Cow<'a, str>,
}

/// Serves one request per connection from a shared route table.
#[derive(Clone)]
pub struct ConnectionHandler {
    config: Arc<ServiceConfig>,
    routes: Arc<RouteTable>,
    sink: Arc<dyn TriggerSink>,
    responder: ResponseBuilder,
}

impl ConnectionHandler {
    pub fn new(
        config: Arc<ServiceConfig>,
        routes: Arc<RouteTable>,
        sink: Arc<dyn TriggerSink>,
    ) -> Self {
        let responder = ResponseBuilder::from_config(&config);
        Self {
            config,
            routes,
            sink,
            responder,
        }
    }

    pub fn config(&self) -> &Arc<ServiceConfig> {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// A fresh context for a connection from `peer`.
    pub fn context(&self, peer: Option<SocketAddr>) -> ServiceContext {
        ServiceContext::new(Arc::clone(&self.config), peer)
    }

    /// Handle one connection end to end. The stream is closed on return.
    pub async fn handle<S>(&self, stream: S, ctx: &ServiceContext) -> Result<Disposition, HttpError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut stream = BufReader::new(stream);

        let head = read_head(&mut stream, self.config.max_line_bytes, |line| {
            tracing::debug!(line = %line.escape_debug(), "Received");
            self.observe(ctx, ObservationKind::RawLine, line);
        })
        .await?;

        if !head.received_any() {
            tracing::debug!("Peer closed before sending anything");
            // Peer is already gone; a failed shutdown changes nothing.
            let _ = stream.shutdown().await;
            return Ok(Disposition::ClosedWithoutResponse);
        }

        let reply = self.dispatch(&head, ctx);
        self.responder
            .send_content(&mut stream, &reply.body, reply.status, TEXT_HTML)
            .await?;

        metrics::counter!("decoy_responses_total", "status" => reply.status.to_string())
            .increment(1);
        Ok(Disposition::Responded(reply.status))
    }

    fn dispatch<'a>(&'a self, head: &RequestHead, ctx: &ServiceContext) -> Reply<'a> {
        let path = match head.path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "Malformed request");
                return Reply {
                    status: 500,
                    body: Cow::Borrowed(ERROR_BODY),
                };
            }
        };

        self.observe(ctx, ObservationKind::PathObserved, path);

        match self.routes.resolve(path) {
            Ok(content) => Reply {
                status: 200,
                body: content.render(ctx, head.lines()),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Route not found");
                Reply {
                    status: 404,
                    body: Cow::Borrowed(NOT_FOUND_PAGE),
                }
            }
        }
    }

    fn observe(&self, ctx: &ServiceContext, kind: ObservationKind, value: &str) {
        metrics::counter!("decoy_observations_total", "kind" => kind.as_str()).increment(1);
        self.sink.observe(Observation {
            session: ctx.session,
            peer: ctx.peer,
            kind,
            value: value.to_string(),
        });
    }
}
