//! Session engine for Pollen Chat.
//!
//! This crate holds the [`ChatSession`] state machine without any terminal
//! dependencies. Front ends drive it through `&mut` operations and render
//! [`SessionView`] projections.
//!
//! ```text
//! ChatSession
//! ├── catalog: ModelCatalog      (remote, fallback, or awaiting timeout choice)
//! ├── staging: FileStaging       (≤ 10 files, ≤ 10 MiB each)
//! ├── conversation / transcript  (pollen-context, persisted after each exchange)
//! └── status: StatusLine         (errors expire after 3 s)
//! ```

mod catalog;
mod compose;
mod config;
mod errors;
mod session;
mod staging;
mod status;
mod streaming;
mod view;

pub use catalog::{CatalogSource, CatalogState, ModelCatalog, TimeoutChoice, model_info};
pub use compose::{ComposedMessage, compose_user_message};
pub use config::{
    BASE_URL_ENV, ConfigError, PollenConfig, ProviderConfig, SessionConfig, StorageConfig,
    config_path, expand_env_vars, log_dir,
};
pub use errors::{ChatError, OpenError, SessionError};
pub use session::{ChatSession, SendOutcome};
pub use staging::{FileStaging, MAX_FILE_BYTES, MAX_STAGED_FILES, StageError};
pub use status::{ERROR_STATUS_TTL, Status, StatusLine};
pub use streaming::{StreamFinish, StreamingReply};
pub use view::{ModelGroupView, SessionView, StagedFileView, TimeoutPromptView};

pub use pollen_context::{ClearConfirmation, StoreError, TranscriptEntry, TranscriptExport};
pub use pollen_types::{
    AttachmentKind, AttachmentSummary, FileRef, Language, Localizer, ModelDescriptor, Role,
    Temperature, TextKey, Theme,
};
