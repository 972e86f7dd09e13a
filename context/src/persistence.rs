//! Mapping of session state onto store keys.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use pollen_types::{Language, Settings, Temperature, Theme};

use crate::conversation::Conversation;
use crate::store::{SettingsStore, StoreError};
use crate::transcript::Transcript;

pub const KEY_THEME: &str = "theme";
pub const KEY_TEMPERATURE: &str = "temperature";
pub const KEY_PRIVATE: &str = "private";
pub const KEY_SELECTED_MODEL: &str = "selectedModel";
pub const KEY_CONVERSATION: &str = "conversationHistory";
pub const KEY_TRANSCRIPT: &str = "chatMessages";
/// Lives in the language store, not the main one.
pub const KEY_LANGUAGE: &str = "language";

/// Proof that the user agreed to wipe the chat.
///
/// Front ends construct it only after an explicit confirmation step.
#[derive(Debug)]
pub struct ClearConfirmation(());

impl ClearConfirmation {
    #[must_use]
    pub fn confirmed() -> Self {
        Self(())
    }
}

fn read_key<T: DeserializeOwned>(store: &dyn SettingsStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(key, "Ignoring undecodable stored value: {e}");
            None
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(value)?)
}

/// Load the stored conversation and transcript. Missing or corrupt values
/// yield empty state.
#[must_use]
pub fn rehydrate(store: &dyn SettingsStore) -> (Conversation, Transcript) {
    let conversation = read_key::<Vec<pollen_types::Message>>(store, KEY_CONVERSATION)
        .map(Conversation::from_messages)
        .unwrap_or_default();
    let transcript = read_key::<Transcript>(store, KEY_TRANSCRIPT).unwrap_or_default();
    tracing::debug!(
        messages = conversation.len(),
        entries = transcript.len(),
        "Rehydrated chat state"
    );
    (conversation, transcript)
}

/// Overwrite both stored keys with the current state.
pub fn persist(
    store: &mut dyn SettingsStore,
    conversation: &Conversation,
    transcript: &Transcript,
) -> Result<(), StoreError> {
    store.set_many(vec![
        (KEY_CONVERSATION, to_value(conversation)?),
        (KEY_TRANSCRIPT, to_value(transcript)?),
    ])
}

pub fn clear(
    store: &mut dyn SettingsStore,
    _confirmation: ClearConfirmation,
) -> Result<(), StoreError> {
    store.remove_many(&[KEY_CONVERSATION, KEY_TRANSCRIPT])
}

#[must_use]
pub fn load_settings(store: &dyn SettingsStore, language_store: &dyn SettingsStore) -> Settings {
    let defaults = Settings::default();
    Settings {
        theme: read_key::<Theme>(store, KEY_THEME).unwrap_or(defaults.theme),
        temperature: read_key::<Temperature>(store, KEY_TEMPERATURE)
            .unwrap_or(defaults.temperature),
        private: read_key::<bool>(store, KEY_PRIVATE).unwrap_or(defaults.private),
        selected_model: read_key::<String>(store, KEY_SELECTED_MODEL),
        language: read_key::<Language>(language_store, KEY_LANGUAGE)
            .unwrap_or(defaults.language),
    }
}

pub fn save_settings(
    store: &mut dyn SettingsStore,
    language_store: &mut dyn SettingsStore,
    settings: &Settings,
) -> Result<(), StoreError> {
    let mut entries = vec![
        (KEY_THEME, to_value(&settings.theme)?),
        (KEY_TEMPERATURE, to_value(&settings.temperature)?),
        (KEY_PRIVATE, Value::Bool(settings.private)),
    ];
    if let Some(model) = &settings.selected_model {
        entries.push((KEY_SELECTED_MODEL, Value::String(model.clone())));
    }
    store.set_many(entries)?;
    language_store.set(KEY_LANGUAGE, to_value(&settings.language)?)
}
