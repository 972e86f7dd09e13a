//! Visible chat transcript.
//!
//! Unlike [`crate::Conversation`], the transcript also holds error notices.
//! Each entry keeps its plain text (for export and copy) next to the rendered
//! HTML fragment that a front end can display directly.

use pulldown_cmark::{CowStr, Event, Options, Parser, html};
use serde::{Deserialize, Serialize};

use pollen_types::{AttachmentSummary, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub markup: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentSummary>,
}

impl TranscriptEntry {
    #[must_use]
    pub fn new(role: Role, text: impl Into<String>, attachments: Vec<AttachmentSummary>) -> Self {
        let text = text.into();
        let markup = render_markup(role, &text, &attachments);
        Self {
            role,
            text,
            markup,
            attachments,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>, attachments: Vec<AttachmentSummary>) {
        self.entries
            .push(TranscriptEntry::new(Role::User, text, attachments));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.entries
            .push(TranscriptEntry::new(Role::Assistant, text, Vec::new()));
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.entries
            .push(TranscriptEntry::new(Role::Error, text, Vec::new()));
    }

    /// Text of the most recent assistant entry.
    #[must_use]
    pub fn last_response(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.role == Role::Assistant)
            .map(|e| e.text.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// HTML fragment for one transcript entry.
///
/// `text` is rendered as Markdown. Raw HTML in it is escaped, never passed
/// through.
#[must_use]
pub fn render_markup(role: Role, text: &str, attachments: &[AttachmentSummary]) -> String {
    let mut out = format!("<div class=\"message {}-message\">", role.as_str());

    for attachment in attachments {
        out.push_str("<div class=\"file-attachment\">");
        html::push_html(
            &mut out,
            std::iter::once(Event::Text(CowStr::Borrowed(attachment.name.as_str()))),
        );
        out.push_str("</div>");
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    html::push_html(&mut out, events);

    out.push_str("</div>");
    out
}
