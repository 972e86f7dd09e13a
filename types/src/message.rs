//! Core message domain model.
//!
//! A [`Message`] is immutable once built. Assistant messages can only be
//! built from non-empty content; the streaming buffer that precedes them lives
//! in the engine.

use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentSummary;
use crate::proofs::NonEmptyString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Locally synthesized failure notice. Shown in the transcript, never sent.
    Error,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
        }
    }

    /// Whether messages with this role may be sent to the provider.
    #[must_use]
    pub const fn is_conversational(self) -> bool {
        matches!(self, Role::User | Role::Assistant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentSummary>,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn user_with_attachments(
        content: impl Into<String>,
        attachments: Vec<AttachmentSummary>,
    ) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            attachments,
        }
    }

    #[must_use]
    pub fn assistant(content: NonEmptyString) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into_inner(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: Role::Error,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn attachments(&self) -> &[AttachmentSummary] {
        &self.attachments
    }
}
