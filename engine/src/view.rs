//! Read-only projection of a session for front ends.

use pollen_context::TranscriptEntry;
use pollen_types::{AttachmentKind, Language, ModelDescriptor, Temperature, Theme};

use crate::catalog::CatalogState;

#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    pub title: String,
    pub status: String,
    pub status_is_error: bool,
    pub theme: Theme,
    pub temperature: Temperature,
    pub private: bool,
    pub language: Language,
    pub catalog_state: CatalogState,
    pub model_groups: Vec<ModelGroupView<'a>>,
    pub selected_model: Option<&'a str>,
    /// Capability line of the selected model, when it is in the catalog.
    pub model_info: Option<String>,
    pub staged: Vec<StagedFileView>,
    pub transcript: &'a [TranscriptEntry],
    pub timeout_prompt: Option<TimeoutPromptView>,
}

#[derive(Debug, Clone)]
pub struct ModelGroupView<'a> {
    pub label: String,
    pub models: Vec<&'a ModelDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFileView {
    pub index: usize,
    pub display_name: String,
    pub kind: AttachmentKind,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutPromptView {
    pub title: String,
    pub message: String,
    pub retry_label: String,
    pub cancel_label: String,
}
