//! Session-level error types.

use pollen_context::StoreError;
use pollen_providers::EndpointError;
use pollen_types::StreamError;
use thiserror::Error;

/// Why a message produced no reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The request failed or was rejected before any text arrived.
    #[error("{0}")]
    Network(String),
    /// The body broke off before any text arrived.
    #[error("{0}")]
    StreamInterrupted(String),
    #[error("nothing to send")]
    EmptyInput,
    #[error("no model selected")]
    NoModelSelected,
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        if err.is_mid_stream() {
            ChatError::StreamInterrupted(err.to_string())
        } else {
            ChatError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error("no catalog timeout prompt is pending")]
    NoPendingPrompt,
}

#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
