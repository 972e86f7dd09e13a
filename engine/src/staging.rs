//! Files waiting to go out with the next message.

use std::path::Path;

use pollen_types::FileRef;
use thiserror::Error;

pub const MAX_STAGED_FILES: usize = 10;
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("maximum {MAX_STAGED_FILES} files at once")]
    TooManyFiles,
    #[error("file {name} is too large ({size_bytes} bytes, maximum 10 MiB)")]
    FileTooLarge { name: String, size_bytes: u64 },
    #[error("cannot read file {name}: {reason}")]
    Unreadable { name: String, reason: String },
}

/// Insertion-ordered, bounded list of staged files.
#[derive(Debug, Clone, Default)]
pub struct FileStaging {
    files: Vec<FileRef>,
}

impl FileStaging {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn files(&self) -> &[FileRef] {
        &self.files
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn stage(&mut self, file: FileRef) -> Result<(), StageError> {
        if self.files.len() >= MAX_STAGED_FILES {
            return Err(StageError::TooManyFiles);
        }
        if file.size_bytes() > MAX_FILE_BYTES {
            return Err(StageError::FileTooLarge {
                name: file.name().to_string(),
                size_bytes: file.size_bytes(),
            });
        }
        tracing::debug!(name = file.name(), size = file.size_bytes(), "Staged file");
        self.files.push(file);
        Ok(())
    }

    /// Stage a file from disk. Contents are read at send time.
    pub fn stage_path(&mut self, path: &Path) -> Result<(), StageError> {
        if self.files.len() >= MAX_STAGED_FILES {
            return Err(StageError::TooManyFiles);
        }
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let metadata = std::fs::metadata(path).map_err(|e| StageError::Unreadable {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(StageError::Unreadable {
                name,
                reason: "not a regular file".to_string(),
            });
        }
        self.stage(FileRef::from_path(path, metadata.len()))
    }

    /// Remove the file at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<FileRef> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Hand every staged file to the caller, leaving the area empty.
    pub fn take(&mut self) -> Vec<FileRef> {
        std::mem::take(&mut self.files)
    }
}
