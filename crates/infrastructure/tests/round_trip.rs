//! Round-trip tests driving the full stack (engine, executor and reqwest
//! adapter) against a local stub server.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use cove_application::PlaygroundEngine;
use cove_domain::{
    EndpointDescriptor, HttpMethod, PlaygroundConfig, RequestErrorKind, ResponseBody,
};
use cove_infrastructure::ReqwestHttpClient;

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Reads one HTTP request (head plus Content-Length body) off the stream.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = find_head_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Serves exactly one connection, replying with `response` and handing the
/// captured request text back through the returned receiver.
async fn spawn_stub(response: String) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        let _ = tx.send(request);
    });
    (addr, rx)
}

fn config(addr: SocketAddr, endpoint: EndpointDescriptor) -> PlaygroundConfig {
    PlaygroundConfig {
        base_url: format!("http://{addr}"),
        endpoints: vec![endpoint],
        default_api_key: None,
        api_key_header: None,
    }
}

fn engine(config: PlaygroundConfig) -> Arc<PlaygroundEngine<ReqwestHttpClient>> {
    Arc::new(PlaygroundEngine::new(config, Arc::new(ReqwestHttpClient::new().unwrap())).unwrap())
}

#[tokio::test]
async fn round_trip_ping_returns_parsed_json() {
    let (addr, _request) =
        spawn_stub(http_response("200 OK", "application/json", "{\"ok\": true}")).await;
    let engine = engine(config(addr, EndpointDescriptor::new(HttpMethod::Get, "/ping")));

    engine.execute().await.unwrap();

    let lifecycle = engine.lifecycle();
    let response = lifecycle.response().unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(
        response.body,
        ResponseBody::Json(serde_json::json!({"ok": true}))
    );
    assert!(response.is_success());
    assert!(response.elapsed_ms < 5_000);
}

#[tokio::test]
async fn text_responses_stay_text() {
    let (addr, _request) = spawn_stub(http_response("200 OK", "text/plain", "pong")).await;
    let engine = engine(config(addr, EndpointDescriptor::new(HttpMethod::Get, "/ping")));

    engine.execute().await.unwrap();

    let lifecycle = engine.lifecycle();
    let response = lifecycle.response().unwrap();
    assert_eq!(response.body, ResponseBody::Text("pong".to_string()));
}

#[tokio::test]
async fn injects_json_content_type_when_absent() {
    let (addr, request_rx) = spawn_stub(http_response("200 OK", "text/plain", "created")).await;
    let engine = engine(config(addr, EndpointDescriptor::new(HttpMethod::Post, "/users")));
    engine.set_body("{\"name\": \"test\"}");

    engine.execute().await.unwrap();

    let captured = request_rx.await.unwrap();
    let lower = captured.to_lowercase();
    assert!(lower.contains("content-type: application/json"));
    assert!(captured.contains("{\"name\": \"test\"}"));
}

#[tokio::test]
async fn explicit_content_type_is_never_overridden() {
    let (addr, request_rx) = spawn_stub(http_response("200 OK", "text/plain", "created")).await;
    let engine = engine(config(addr, EndpointDescriptor::new(HttpMethod::Post, "/users")));
    engine.set_header("content-type", "application/vnd.demo+json");
    engine.set_body("{\"name\": \"test\"}");

    engine.execute().await.unwrap();

    let captured = request_rx.await.unwrap().to_lowercase();
    assert!(captured.contains("content-type: application/vnd.demo+json"));
    assert!(!captured.contains("content-type: application/json\r"));
}

#[tokio::test]
async fn slow_server_times_out_with_the_specific_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // hold the connection open without ever responding
        let conn = listener.accept().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(conn);
    });

    let engine = Arc::new(
        PlaygroundEngine::new(
            config(addr, EndpointDescriptor::new(HttpMethod::Get, "/ping")),
            Arc::new(ReqwestHttpClient::new().unwrap()),
        )
        .unwrap()
        .with_request_timeout(Duration::from_millis(100)),
    );

    engine.execute().await.unwrap();

    let lifecycle = engine.lifecycle();
    let (kind, message) = lifecycle.failure().unwrap();
    assert_eq!(kind, RequestErrorKind::Timeout);
    assert!(message.contains("timed out"));
}

#[tokio::test]
async fn refused_connection_surfaces_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let engine = engine(config(addr, EndpointDescriptor::new(HttpMethod::Get, "/ping")));
    engine.execute().await.unwrap();

    let lifecycle = engine.lifecycle();
    let (kind, _message) = lifecycle.failure().unwrap();
    assert_eq!(kind, RequestErrorKind::Transport);
}
