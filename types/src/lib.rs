//! Core domain types for Pollen Chat.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod attachment;
mod locale;
mod message;
mod model;
mod proofs;
mod settings;
mod text;

pub use attachment::{
    AttachmentKind, AttachmentSummary, DISPLAY_NAME_MAX_CHARS, FileRef, FileSource,
};
pub use locale::{BuiltinLocalizer, Localizer, TextKey};
pub use message::{Message, Role};
pub use model::{
    DEFAULT_MODEL, ModelCategory, ModelDescriptor, ModelFeature, ModelGroup, RECOMMENDED_MODELS,
    fallback_catalog, group_models, select_model,
};
pub use proofs::{EmptyStringError, NonEmptyString};
pub use settings::{
    DEFAULT_TEMPERATURE, Language, MAX_TEMPERATURE, MIN_TEMPERATURE, SettingParseError, Settings,
    Temperature, Theme,
};
pub use text::fill_placeholders;

use thiserror::Error;

// ============================================================================
// Streaming Types
// ============================================================================

/// Why a completion stream stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The provider answered with a non-success status.
    #[error("API error {status}: {body}")]
    Http { status: u16, body: String },
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Connection(String),
    /// The connection dropped while the body was being read.
    #[error("Stream interrupted: {0}")]
    Interrupted(String),
    #[error("Stream idle timeout")]
    IdleTimeout,
}

impl StreamError {
    /// Whether the failure happened after the response body started.
    #[must_use]
    pub const fn is_mid_stream(&self) -> bool {
        matches!(self, StreamError::Interrupted(_) | StreamError::IdleTimeout)
    }
}

/// Events emitted while consuming a completion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One incremental fragment of assistant text.
    TextDelta(String),
    Done,
    Error(StreamError),
}

#[cfg(test)]
mod tests {
    use super::StreamError;

    #[test]
    fn mid_stream_classification() {
        assert!(StreamError::Interrupted("reset".into()).is_mid_stream());
        assert!(StreamError::IdleTimeout.is_mid_stream());
        assert!(!StreamError::Connection("refused".into()).is_mid_stream());
        assert!(
            !StreamError::Http {
                status: 500,
                body: String::new()
            }
            .is_mid_stream()
        );
    }

    #[test]
    fn http_error_display() {
        let err = StreamError::Http {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: bad gateway");
    }
}
