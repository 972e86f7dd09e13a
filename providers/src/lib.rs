//! Pollinations text API client with streaming support.
//!
//! # Architecture
//!
//! - [`ProviderClient`] - validated base URL plus a tuned [`reqwest::Client`]
//! - [`catalog`] - `GET {base}/models`, raced against a deadline
//! - [`chat`] - `POST {base}/openai` with `stream: true`
//!
//! Chat responses are emitted through a [`tokio::sync::mpsc::Sender<StreamEvent>`]
//! channel, allowing the caller to render content as it arrives.
//!
//! # Stream Format
//!
//! The body is a sequence of newline-terminated lines. Only lines starting with
//! `data: ` carry information. `data: [DONE]` ends the stream; every other
//! payload is a JSON chunk whose `choices[0].delta.content` holds the next
//! fragment of assistant text.
//!
//! # Error Handling
//!
//! Stream failures are delivered as `StreamEvent::Error` events rather than
//! `Result::Err` returns, so partial output is already in the caller's hands
//! when the error arrives.

pub mod catalog;
pub mod chat;
pub mod sse_types;

use std::time::Duration;

use pollen_types::{StreamError, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

pub use pollen_types;

/// Canonical Pollinations text API base URL.
pub const DEFAULT_BASE_URL: &str = "https://text.pollinations.ai";
/// How long the catalog fetch may take before the user is asked what to do.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(20);
/// Maximum silence between two body chunks of a chat stream.
pub const DEFAULT_STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Upper bound for a single unterminated line held in the decode buffer.
const MAX_LINE_BUFFER_BYTES: usize = 4 * 1024 * 1024;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid provider URL '{raw}': {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported provider URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client bound to one provider base URL.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    base: Url,
}

impl ProviderClient {
    /// Validate `base_url` and build a client for it.
    ///
    /// HTTPS bases get an HTTPS-only client; plain HTTP is accepted for local
    /// proxies and test servers.
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base_url.trim()).map_err(|source| EndpointError::InvalidUrl {
            raw: base_url.to_string(),
            source,
        })?;
        let https = match base.scheme() {
            "https" => true,
            "http" => false,
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        };
        let http = client_builder().https_only(https).build()?;
        Ok(Self { http, base })
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for `path` under the base, keeping any base path prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Remove and return the next complete line, without its terminator.
///
/// A trailing `\r` is stripped so CRLF bodies behave like LF bodies.
fn drain_next_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let pos = buffer.iter().position(|&b| b == b'\n')?;
    let mut line: Vec<u8> = buffer.drain(..=pos).collect();
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Some(line)
}

/// Payload of a `data: ` line, trimmed. `None` for every other line.
fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX).map(str::trim)
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineAction {
    Continue,
    Emit(String),
    Done,
}

/// Interpret one line of the body.
///
/// Malformed JSON lines are skipped.
pub(crate) fn parse_line(line: &[u8]) -> LineAction {
    let line = String::from_utf8_lossy(line);
    let Some(data) = extract_data_payload(&line) else {
        return LineAction::Continue;
    };

    if data == DONE_MARKER {
        return LineAction::Done;
    }

    match serde_json::from_str::<sse_types::ChatChunk>(data) {
        Ok(chunk) => match chunk.into_delta_text() {
            Some(text) => LineAction::Emit(text),
            None => LineAction::Continue,
        },
        Err(e) => {
            tracing::debug!(%e, payload_bytes = data.len(), "Ignoring malformed stream line");
            LineAction::Continue
        }
    }
}

pub(crate) async fn send_event(tx: &mpsc::Sender<StreamEvent>, event: StreamEvent) -> bool {
    tx.send(event).await.is_ok()
}

/// Consume a chat completion body, emitting one `TextDelta` per fragment.
///
/// Exactly one terminal event (`Done` or `Error`) is sent unless the receiver
/// goes away first. A body that ends without `[DONE]` counts as complete.
pub(crate) async fn process_data_stream(
    response: reqwest::Response,
    tx: &mpsc::Sender<StreamEvent>,
    idle_timeout: Duration,
) {
    use futures_util::StreamExt;

    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        let Ok(next) = tokio::time::timeout(idle_timeout, stream.next()).await else {
            tracing::warn!(?idle_timeout, "Chat stream went idle");
            let _ = send_event(tx, StreamEvent::Error(StreamError::IdleTimeout)).await;
            return;
        };

        let chunk = match next {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => {
                tracing::warn!(%e, "Chat stream interrupted");
                let _ = send_event(tx, StreamEvent::Error(StreamError::Interrupted(e.to_string())))
                    .await;
                return;
            }
            None => break,
        };
        buffer.extend_from_slice(&chunk);

        while let Some(line) = drain_next_line(&mut buffer) {
            match parse_line(&line) {
                LineAction::Continue => {}
                LineAction::Emit(text) => {
                    if !send_event(tx, StreamEvent::TextDelta(text)).await {
                        return;
                    }
                }
                LineAction::Done => {
                    let _ = send_event(tx, StreamEvent::Done).await;
                    return;
                }
            }
        }

        if buffer.len() > MAX_LINE_BUFFER_BYTES {
            let _ = send_event(
                tx,
                StreamEvent::Error(StreamError::Interrupted(
                    "stream line exceeded maximum size (4 MiB)".to_string(),
                )),
            )
            .await;
            return;
        }
    }

    // The final line may lack a terminator.
    if !buffer.is_empty()
        && let LineAction::Emit(text) = parse_line(&buffer)
        && !send_event(tx, StreamEvent::TextDelta(text)).await
    {
        return;
    }

    tracing::debug!("Chat stream ended without [DONE]; treating as complete");
    let _ = send_event(tx, StreamEvent::Done).await;
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
