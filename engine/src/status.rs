//! Transient status line.

use std::time::{Duration, Instant};

/// How long an error stays visible before the line returns to ready.
pub const ERROR_STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Rendered as the localized "ready" text.
    #[default]
    Ready,
    Info(String),
    Error(String),
}

impl Status {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    status: Status,
    error_expires_at: Option<Instant>,
}

impl StatusLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &Status {
        &self.status
    }

    /// Info messages stay until replaced.
    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Status::Info(text.into());
        self.error_expires_at = None;
    }

    pub fn set_error(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Status::Error(text.into());
        self.error_expires_at = Some(now + ERROR_STATUS_TTL);
    }

    /// Expire a stale error. Returns true if the line changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.error_expires_at {
            Some(deadline) if now >= deadline => {
                self.status = Status::Ready;
                self.error_expires_at = None;
                true
            }
            _ => false,
        }
    }
}
