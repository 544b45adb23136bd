//! End-to-end tests over real TCP connections.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use decoy_http::http::{ERROR_BODY, NOT_FOUND_PAGE};
use decoy_http::{ObservationKind, RouteContent, RouteTable, ServiceConfig};

mod common;

use common::{raw_exchange, start_decoy, start_decoy_with, ParsedResponse};

#[tokio::test]
async fn static_route_returns_content() {
    let mut routes = RouteTable::new();
    routes.add_route("/", "hello");
    let decoy = start_decoy(routes).await;

    let response = ParsedResponse::parse(&raw_exchange(decoy.addr, b"GET / HTTP/1.1\r\n\r\n").await);

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.body, "hello");
    assert_eq!(response.header("Content-Length"), Some("5"));
}

#[tokio::test]
async fn missing_route_returns_not_found_page() {
    let decoy = start_decoy(RouteTable::new()).await;

    let response =
        ParsedResponse::parse(&raw_exchange(decoy.addr, b"GET /missing HTTP/1.1\r\n\r\n").await);

    assert_eq!(response.status_line, "HTTP/1.1 404 Not Found");
    assert_eq!(response.body, NOT_FOUND_PAGE);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
}

#[tokio::test]
async fn empty_stream_gets_no_response() {
    let decoy = start_decoy(RouteTable::new()).await;

    let response = raw_exchange(decoy.addr, b"").await;

    assert!(response.is_empty());
}

#[tokio::test]
async fn garbage_line_returns_error() {
    let decoy = start_decoy(RouteTable::new()).await;

    let response = ParsedResponse::parse(&raw_exchange(decoy.addr, b"GARBAGE\r\n\r\n").await);

    assert_eq!(response.status_line, "HTTP/1.1 500 Internal Server Error");
    assert_eq!(response.body, ERROR_BODY);
    assert_eq!(response.header("Content-Length"), Some("6"));
}

#[tokio::test]
async fn dynamic_route_counts_lines() {
    let mut routes = RouteTable::new();
    routes.add_route(
        "/dyn",
        RouteContent::dynamic(|_, lines| format!("{} lines", lines.len())),
    );
    let decoy = start_decoy(routes).await;

    let response = ParsedResponse::parse(
        &raw_exchange(decoy.addr, b"GET /dyn HTTP/1.1\r\nHost: decoy\r\n\r\n").await,
    );

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.body, "2 lines");
}

#[tokio::test]
async fn dynamic_route_is_never_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut routes = RouteTable::new();
    routes.add_route(
        "/count",
        RouteContent::dynamic(move |_, _| (counter.fetch_add(1, Ordering::SeqCst) + 1).to_string()),
    );
    let decoy = start_decoy(routes).await;

    for expected in ["1", "2", "3"] {
        let response =
            ParsedResponse::parse(&raw_exchange(decoy.addr, b"GET /count HTTP/1.1\r\n\r\n").await);
        assert_eq!(response.body, expected);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn headers_follow_fixed_order() {
    let mut routes = RouteTable::new();
    routes.add_route("/", "<html></html>");
    let decoy = start_decoy(routes).await;

    let response = ParsedResponse::parse(&raw_exchange(decoy.addr, b"GET / HTTP/1.1\r\n\r\n").await);

    assert_eq!(
        response.header_names(),
        ["Server", "Date", "Content-Type", "Content-Length", "Connection"]
    );
    assert_eq!(response.header("Server"), Some("HTTPStatic"));
    assert_eq!(response.header("Connection"), Some("close"));
    assert!(response.header("Date").unwrap().ends_with(" GMT"));
}

#[tokio::test]
async fn close_policy_can_drop_the_header() {
    let config = ServiceConfig {
        close_connection: false,
        banner: "Apache/2.4.41 (Ubuntu)".into(),
        ..Default::default()
    };
    let decoy = start_decoy_with(config, RouteTable::new()).await;

    // The connection still closes; only the header goes away.
    let response = ParsedResponse::parse(&raw_exchange(decoy.addr, b"GET / HTTP/1.1\r\n\r\n").await);

    assert_eq!(
        response.header_names(),
        ["Server", "Date", "Content-Type", "Content-Length"]
    );
    assert_eq!(response.header("Server"), Some("Apache/2.4.41 (Ubuntu)"));
}

#[tokio::test]
async fn keep_alive_request_is_still_closed() {
    let mut routes = RouteTable::new();
    routes.add_route("/", "hello");
    let decoy = start_decoy(routes).await;

    let mut stream = TcpStream::connect(decoy.addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n")
        .await
        .unwrap();

    // No half-close from our side: the decoy must close on its own.
    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("decoy kept the connection open")
        .unwrap();

    assert_eq!(ParsedResponse::parse(&response).body, "hello");
}

#[tokio::test]
async fn observations_reach_the_sink() {
    let mut decoy = start_decoy(RouteTable::new()).await;

    raw_exchange(decoy.addr, b"GET /.env HTTP/1.1\r\nHost: target\r\n\r\n").await;

    let mut seen = Vec::new();
    for _ in 0..3 {
        let observation = tokio::time::timeout(Duration::from_secs(5), decoy.observations.recv())
            .await
            .unwrap()
            .unwrap();
        seen.push((observation.kind, observation.value));
    }

    assert_eq!(
        seen,
        vec![
            (ObservationKind::RawLine, "GET /.env HTTP/1.1\r\n".to_string()),
            (ObservationKind::RawLine, "Host: target\r\n".to_string()),
            (ObservationKind::PathObserved, "/.env".to_string()),
        ]
    );
}

#[tokio::test]
async fn stalled_peer_is_cut_off_by_deadline() {
    let mut config = ServiceConfig::default();
    config.timeouts.read_secs = 1;
    let decoy = start_decoy_with(config, RouteTable::new()).await;

    let mut stream = TcpStream::connect(decoy.addr).await.unwrap();
    stream.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("deadline did not close the connection")
        .ok();

    assert!(response.is_empty());
}

#[tokio::test]
async fn works_with_a_real_http_client() {
    let mut routes = RouteTable::new();
    routes.add_route("/login", "<form></form>");
    let decoy = start_decoy(routes).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/login", decoy.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["server"], "HTTPStatic");
    assert_eq!(res.text().await.unwrap(), "<form></form>");
}

#[tokio::test]
async fn shutdown_stops_the_server() {
    let decoy = start_decoy(RouteTable::new()).await;

    decoy.shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(10), decoy.task)
        .await
        .expect("server did not stop")
        .unwrap();
}
