//! Typed chunk structures for chat completion streams.
//!
//! Parse errors happen at the serde boundary, not scattered through
//! parsing logic. Every field is optional: the provider proxies several
//! upstream vendors and their chunks disagree on which keys are present.

use serde::Deserialize;

/// One `data:` payload of a streaming chat completion.
#[derive(Debug, Default, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Reported by some upstreams; informational only.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub delta: Option<Delta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatChunk {
    /// Text of `choices[0].delta.content`, if present and non-empty.
    #[must_use]
    pub fn into_delta_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty())
    }
}
