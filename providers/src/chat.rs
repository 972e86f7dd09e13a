//! Streaming chat completions.

use std::time::Duration;

use pollen_types::{Message, StreamError, StreamEvent, Temperature};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::{ProviderClient, process_data_stream, read_capped_error_body, send_event};

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

/// Body of `POST {base}/openai`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    stream: bool,
    private: bool,
}

impl ChatRequest {
    /// Build a streaming request. Error-role messages are never sent.
    pub fn new<'a>(
        model: impl Into<String>,
        messages: impl IntoIterator<Item = &'a Message>,
        temperature: Temperature,
        private: bool,
    ) -> Self {
        let messages = messages
            .into_iter()
            .filter(|m| m.role().is_conversational())
            .map(|m| WireMessage {
                role: m.role().as_str(),
                content: m.content().to_string(),
            })
            .collect();
        Self {
            model: model.into(),
            messages,
            temperature: temperature.value(),
            stream: true,
            private,
        }
    }
}

/// Send `request` and forward the reply as [`StreamEvent`]s on `tx`.
///
/// Always finishes with exactly one terminal event unless `tx` is closed.
pub async fn stream_chat(
    client: &ProviderClient,
    request: &ChatRequest,
    tx: mpsc::Sender<StreamEvent>,
    idle_timeout: Duration,
) {
    let url = client.endpoint("openai");
    tracing::debug!(
        %url,
        model = %request.model,
        messages = request.messages.len(),
        private = request.private,
        "Sending chat request"
    );

    let response = match client
        .http()
        .post(&url)
        .header("accept", "text/event-stream")
        .json(request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(%e, "Chat request failed");
            let _ = send_event(&tx, StreamEvent::Error(StreamError::Connection(e.to_string())))
                .await;
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        let body = read_capped_error_body(response).await;
        tracing::warn!(status = status.as_u16(), "Chat request rejected");
        let _ = send_event(
            &tx,
            StreamEvent::Error(StreamError::Http {
                status: status.as_u16(),
                body,
            }),
        )
        .await;
        return;
    }

    process_data_stream(response, &tx, idle_timeout).await;
}
