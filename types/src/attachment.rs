//! User-chosen files and the snapshots that outlive them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::text::truncate_preview;

/// Maximum characters of a file name shown in compact lists.
pub const DISPLAY_NAME_MAX_CHARS: usize = 20;

/// File name suffixes treated as text regardless of MIME type.
const TEXT_EXTENSIONS: &[&str] = &[".json", ".md", ".js", ".py"];

/// How an attachment contributes to the outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Decoded and inlined under a "file content" header.
    Text,
    /// Referenced by a textual placeholder only.
    Image,
    /// Shown in the transcript, contributes nothing to the request.
    Other,
}

impl AttachmentKind {
    #[must_use]
    pub fn classify(name: &str, mime_type: &str) -> Self {
        if mime_type.starts_with("text/") || TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        {
            AttachmentKind::Text
        } else if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::Other
        }
    }
}

/// Where the file's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A staged file handle. Owned by the staging area until send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    name: String,
    mime_type: String,
    size_bytes: u64,
    source: FileSource,
}

impl FileRef {
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    /// Reference a file on disk by its declared size. Nothing is read here.
    ///
    /// The MIME type is guessed from the extension.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = guess_mime_type(&path);
        Self {
            name,
            mime_type,
            size_bytes,
            source: FileSource::Path(path),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    #[must_use]
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    #[must_use]
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::classify(&self.name, &self.mime_type)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        truncate_preview(&self.name, DISPLAY_NAME_MAX_CHARS, "...")
    }

    #[must_use]
    pub fn summary(&self) -> AttachmentSummary {
        AttachmentSummary {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            kind: self.kind(),
        }
    }
}

fn guess_mime_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mime = match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "text/xml",
        "js" | "mjs" => "text/javascript",
        "py" => "text/x-python",
        "rs" => "text/x-rust",
        "json" => "application/json",
        "toml" => "application/toml",
        "yaml" | "yml" => "application/yaml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

/// What remains of a [`FileRef`] once the message is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub kind: AttachmentKind,
}

#[cfg(test)]
mod tests {
    use super::{AttachmentKind, FileRef};

    #[test]
    fn text_mime_is_text() {
        assert_eq!(
            AttachmentKind::classify("notes.txt", "text/plain"),
            AttachmentKind::Text
        );
    }

    #[test]
    fn allowlisted_extension_wins_over_mime() {
        assert_eq!(
            AttachmentKind::classify("data.json", "application/json"),
            AttachmentKind::Text
        );
        assert_eq!(
            AttachmentKind::classify("script.py", "application/octet-stream"),
            AttachmentKind::Text
        );
    }

    #[test]
    fn images_and_others() {
        assert_eq!(
            AttachmentKind::classify("cat.png", "image/png"),
            AttachmentKind::Image
        );
        assert_eq!(
            AttachmentKind::classify("doc.pdf", "application/pdf"),
            AttachmentKind::Other
        );
    }

    #[test]
    fn from_path_guesses_mime() {
        let file = FileRef::from_path("/tmp/readme.md", 12);
        assert_eq!(file.name(), "readme.md");
        assert_eq!(file.size_bytes(), 12);
        assert_eq!(file.kind(), AttachmentKind::Text);

        let image = FileRef::from_path("/tmp/photo.JPG", 10);
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.kind(), AttachmentKind::Image);

        let blob = FileRef::from_path("/tmp/archive.tar", 10);
        assert_eq!(blob.mime_type(), "application/octet-stream");
        assert_eq!(blob.kind(), AttachmentKind::Other);
    }

    #[test]
    fn display_name_is_shortened() {
        let file = FileRef::from_bytes("a_really_long_file_name_here.txt", "text/plain", vec![]);
        assert_eq!(file.display_name(), "a_really_long_file_n...");
        let short = FileRef::from_bytes("short.txt", "text/plain", vec![]);
        assert_eq!(short.display_name(), "short.txt");
    }
}
