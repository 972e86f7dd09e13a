//! Shared test utilities and fixtures
//!
//! Mock Pollinations endpoints and session builders for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use pollen_engine::{ChatSession, SessionConfig};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Catalog with one model per category.
pub fn sample_catalog() -> serde_json::Value {
    json!([
        {"name": "openai", "description": "OpenAI GPT-4o mini", "vision": true},
        {"name": "deepseek-reasoning", "description": "DeepSeek R1", "reasoning": true, "tier": "seed"},
        {"name": "openai-audio", "description": "GPT-4o audio", "audio": true},
        {"name": "mistral", "description": "Mistral Small"}
    ])
}

pub async fn mount_catalog(server: &MockServer, catalog: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog))
        .mount(server)
        .await;
}

/// A catalog endpoint that answers only after `delay`, at most `times` times.
pub async fn mount_slow_catalog(server: &MockServer, delay: Duration, times: u64) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_catalog())
                .set_delay(delay),
        )
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Body of a streamed chat reply, one `data:` line per fragment.
pub fn data_stream(fragments: &[&str], done: bool) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let chunk = json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    if done {
        body.push_str("data: [DONE]\n\n");
    }
    body
}

pub async fn mount_stream(server: &MockServer, fragments: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/openai"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(data_stream(fragments, true)),
        )
        .mount(server)
        .await;
}

pub async fn mount_chat_failure(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/openai"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve one chat request whose body is cut off after `sent`.
///
/// The response advertises more bytes than it delivers, then closes.
pub async fn spawn_truncating_chat(sent: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 8192];
        let _ = socket.read(&mut buf).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncontent-length: {}\r\n\r\n{sent}",
            sent.len() + 100
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
    });
    format!("http://{addr}")
}

/// Session config with both stores under `dir`.
pub fn config_in(dir: &Path, base_url: &str) -> SessionConfig {
    SessionConfig {
        base_url: base_url.to_string(),
        catalog_timeout: Duration::from_millis(300),
        stream_idle_timeout: Duration::from_secs(5),
        store_path: dir.join("store.json"),
        language_store_path: dir.join("language.json"),
    }
}

pub fn open_session(dir: &Path, base_url: &str) -> ChatSession {
    ChatSession::open(config_in(dir, base_url)).unwrap()
}

/// A session with a loaded catalog and a chat endpoint streaming `fragments`.
pub async fn ready_session(dir: &Path, fragments: &[&str]) -> (MockServer, ChatSession) {
    let server = MockServer::start().await;
    mount_catalog(&server, sample_catalog()).await;
    mount_stream(&server, fragments).await;
    let mut session = open_session(dir, &server.uri());
    session.load_models().await;
    (server, session)
}
