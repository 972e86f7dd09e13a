//! Chat state that outlives a single request.
//!
//! ```text
//! ChatSession (engine)
//! ├── conversation: Conversation   (what is sent to the provider)
//! ├── transcript: Transcript       (what the user sees, incl. errors)
//! └── store: dyn SettingsStore     (JsonFileStore on disk)
//! ```
//!
//! [`persistence`] maps both onto store keys; [`export`] turns the
//! transcript into the saved-chat text file.

mod atomic_write;
mod conversation;
mod export;
pub mod persistence;
mod store;
mod transcript;

pub use atomic_write::{AtomicWriteOptions, atomic_write};
pub use conversation::{Conversation, NotAUserMessage};
pub use export::{TranscriptExport, export_transcript};
pub use persistence::ClearConfirmation;
pub use store::{JsonFileStore, MemoryStore, SettingsStore, StoreError};
pub use transcript::{Transcript, TranscriptEntry, render_markup};
