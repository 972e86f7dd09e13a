//! Plain-text transcript export.

use chrono::{DateTime, Local};

use pollen_types::{Localizer, Role, TextKey};

use crate::transcript::Transcript;

const FILE_PREFIX: &str = "polination-chat-";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptExport {
    pub file_name: String,
    pub contents: String,
}

/// Render `transcript` as the saved-chat text file.
#[must_use]
pub fn export_transcript(
    transcript: &Transcript,
    localizer: &dyn Localizer,
    now: DateTime<Local>,
) -> TranscriptExport {
    let mut contents = format!(
        "{} - {}\n\n",
        localizer.text(TextKey::Title),
        now.format(TIMESTAMP_FORMAT)
    );

    for entry in transcript.entries() {
        let label = match entry.role {
            Role::User => localizer.text(TextKey::User),
            Role::Assistant | Role::Error => localizer.text(TextKey::Ai),
        };
        contents.push_str(&format!("{label}: {}\n\n", entry.text));
    }

    TranscriptExport {
        file_name: format!("{FILE_PREFIX}{}.txt", now.timestamp_millis()),
        contents,
    }
}
