//! Assistant reply being streamed.

use tokio::sync::mpsc;

use pollen_types::{NonEmptyString, StreamError, StreamEvent};

pub(crate) const STREAM_EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFinish {
    Done,
    Error(StreamError),
}

/// A reply being streamed - existence proves a request is in flight.
/// Consuming it yields the final assistant text, if any arrived.
#[derive(Debug)]
pub struct StreamingReply {
    content: String,
    fragments: usize,
    receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamingReply {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self {
            content: String::new(),
            fragments: 0,
            receiver,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Next event, or a synthetic interruption if the producer vanished
    /// without a terminal event.
    pub async fn next_event(&mut self) -> StreamEvent {
        match self.receiver.recv().await {
            Some(event) => event,
            None => StreamEvent::Error(StreamError::Interrupted(
                "stream task ended unexpectedly".to_string(),
            )),
        }
    }

    pub fn apply_event(&mut self, event: StreamEvent) -> Option<StreamFinish> {
        match event {
            StreamEvent::TextDelta(text) => {
                if !text.is_empty() {
                    self.content.push_str(&text);
                    self.fragments += 1;
                }
                None
            }
            StreamEvent::Done => Some(StreamFinish::Done),
            StreamEvent::Error(err) => Some(StreamFinish::Error(err)),
        }
    }

    pub fn into_reply(self) -> Option<NonEmptyString> {
        NonEmptyString::new(self.content).ok()
    }
}
