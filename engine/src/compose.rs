//! Folding staged attachments into the outgoing user message.

use pollen_types::{AttachmentKind, AttachmentSummary, FileRef, FileSource, Localizer, TextKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    /// Text sent to the provider.
    pub content: String,
    /// One summary per staged file, in staging order.
    pub attachments: Vec<AttachmentSummary>,
}

/// Build the user message content for `text` plus `files`.
///
/// Text-like files are inlined under a localized header; images leave a
/// placeholder; other files contribute nothing. A file that cannot be read
/// is left out of the content but still listed in `attachments`.
pub async fn compose_user_message(
    text: &str,
    files: &[FileRef],
    localizer: &dyn Localizer,
) -> ComposedMessage {
    let mut content = text.trim().to_string();

    for file in files {
        let values = [("filename", file.name())];
        match file.kind() {
            AttachmentKind::Text => match read_text(file).await {
                Ok(body) => {
                    let header = localizer.format(TextKey::FileContent, &values);
                    content.push_str(&format!("\n\n{header}\n\n{body}"));
                }
                Err(e) => {
                    tracing::warn!(name = file.name(), "Skipping unreadable attachment: {e}");
                }
            },
            AttachmentKind::Image => {
                let placeholder = localizer.format(TextKey::ImageFile, &values);
                content.push_str(&format!("\n\n[{placeholder}]"));
            }
            AttachmentKind::Other => {}
        }
    }

    ComposedMessage {
        content: content.trim().to_string(),
        attachments: files.iter().map(FileRef::summary).collect(),
    }
}

async fn read_text(file: &FileRef) -> std::io::Result<String> {
    match file.source() {
        FileSource::Bytes(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        FileSource::Path(path) => {
            let bytes = tokio::fs::read(path).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
