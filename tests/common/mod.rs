//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use decoy_http::net::Listener;
use decoy_http::triggers::ChannelSink;
use decoy_http::{DecoyServer, Observation, RouteTable, ServiceConfig, Shutdown};

/// A decoy running on an ephemeral local port.
pub struct RunningDecoy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub observations: UnboundedReceiver<Observation>,
    pub task: JoinHandle<()>,
}

/// Start a decoy with `routes` and otherwise default configuration.
pub async fn start_decoy(routes: RouteTable) -> RunningDecoy {
    start_decoy_with(ServiceConfig::default(), routes).await
}

/// Start a decoy with an explicit configuration; address and port are replaced.
pub async fn start_decoy_with(mut config: ServiceConfig, routes: RouteTable) -> RunningDecoy {
    config.address = "127.0.0.1".into();
    config.port = 0;

    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let listener = Listener::from_tcp(tcp, config.max_connections);

    let (sink, observations) = ChannelSink::new();
    let server = DecoyServer::new(config, routes, Arc::new(sink));

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    RunningDecoy {
        addr,
        shutdown,
        observations,
        task,
    }
}

/// Send raw bytes, half-close, and read everything the decoy sends back.
pub async fn raw_exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

/// A parsed response: status line, headers in wire order, body.
#[allow(dead_code)]
pub struct ParsedResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl ParsedResponse {
    pub fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(": ").unwrap();
                (name.to_string(), value.to_string())
            })
            .collect();

        Self {
            status_line,
            headers,
            body: body.to_string(),
        }
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }
}
