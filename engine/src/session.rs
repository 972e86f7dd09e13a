//! The chat session controller.
//!
//! One `ChatSession` exists per open chat window. Every operation takes
//! `&mut self`, so a second send cannot start while one is streaming.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use tokio::sync::mpsc;

use pollen_context::persistence::{self, ClearConfirmation};
use pollen_context::{
    Conversation, JsonFileStore, SettingsStore, StoreError, Transcript, TranscriptExport,
    export_transcript,
};
use pollen_providers::catalog::{CatalogError, load_catalog};
use pollen_providers::chat::{ChatRequest, stream_chat};
use pollen_providers::ProviderClient;
use pollen_types::{
    BuiltinLocalizer, DEFAULT_MODEL, FileRef, Language, Localizer, Message, Settings,
    StreamError, Temperature, TextKey, Theme, select_model,
};

use crate::catalog::{CatalogSource, CatalogState, ModelCatalog, TimeoutChoice, model_info};
use crate::compose::compose_user_message;
use crate::config::SessionConfig;
use crate::errors::{ChatError, OpenError, SessionError};
use crate::staging::{FileStaging, StageError};
use crate::status::{Status, StatusLine};
use crate::streaming::{STREAM_EVENT_CHANNEL_CAPACITY, StreamFinish, StreamingReply};
use crate::view::{ModelGroupView, SessionView, StagedFileView, TimeoutPromptView};

/// Result of a send that produced a reply or finished cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Final assistant text. `None` when the provider sent nothing.
    pub reply: Option<String>,
    /// Set when the stream broke off after some text had arrived.
    pub interrupted: Option<StreamError>,
}

pub struct ChatSession {
    config: SessionConfig,
    client: ProviderClient,
    store: Box<dyn SettingsStore>,
    language_store: Box<dyn SettingsStore>,
    localizer: BuiltinLocalizer,
    settings: Settings,
    catalog: ModelCatalog,
    selected_model: Option<String>,
    staging: FileStaging,
    conversation: Conversation,
    transcript: Transcript,
    status: StatusLine,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("base_url", &self.config.base_url)
            .field("settings", &self.settings)
            .field("selected_model", &self.selected_model)
            .field("messages", &self.conversation.len())
            .field("transcript", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Open a session backed by the JSON stores named in `config`.
    pub fn open(config: SessionConfig) -> Result<Self, OpenError> {
        let store = JsonFileStore::open(&config.store_path)?;
        let language_store = JsonFileStore::open(&config.language_store_path)?;
        Ok(Self::with_stores(
            config,
            Box::new(store),
            Box::new(language_store),
        )?)
    }

    /// Open a session over caller-provided stores.
    ///
    /// Settings and the previous chat are restored before this returns.
    pub fn with_stores(
        config: SessionConfig,
        store: Box<dyn SettingsStore>,
        language_store: Box<dyn SettingsStore>,
    ) -> Result<Self, pollen_providers::EndpointError> {
        let client = ProviderClient::new(&config.base_url)?;
        let settings = persistence::load_settings(store.as_ref(), language_store.as_ref());
        let (conversation, transcript) = persistence::rehydrate(store.as_ref());
        tracing::info!(
            base_url = %config.base_url,
            messages = conversation.len(),
            "Chat session opened"
        );

        Ok(Self {
            client,
            localizer: BuiltinLocalizer::new(settings.language),
            settings,
            store,
            language_store,
            catalog: ModelCatalog::default(),
            selected_model: None,
            staging: FileStaging::new(),
            conversation,
            transcript,
            status: StatusLine::new(),
            config,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn staged_files(&self) -> &[FileRef] {
        self.staging.files()
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        self.status.current()
    }

    #[must_use]
    pub fn localizer(&self) -> &BuiltinLocalizer {
        &self.localizer
    }

    /// Expire a stale error status. Returns true if the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.status.tick(now)
    }

    fn info(&mut self, key: TextKey) {
        let text = self.localizer.text(key).into_owned();
        self.status.set_info(text);
    }

    fn error(&mut self, text: String) {
        self.status.set_error(text, Instant::now());
    }

    // ------------------------------------------------------------------
    // Model catalog
    // ------------------------------------------------------------------

    /// Fetch the catalog, racing the configured deadline.
    ///
    /// A network failure installs the fallback catalog. A timeout installs
    /// nothing and leaves the session waiting for [`Self::resolve_timeout`].
    pub async fn load_models(&mut self) -> CatalogState {
        self.info(TextKey::LoadingModels);
        match load_catalog(&self.client, self.config.catalog_timeout).await {
            Ok(models) => {
                self.install_catalog(models, CatalogSource::Remote);
                self.info(TextKey::ModelsLoaded);
            }
            Err(CatalogError::Timeout(_)) => {
                self.catalog.await_timeout_choice();
                self.error(self.localizer.text(TextKey::ErrorLoadingModels).into_owned());
            }
            Err(CatalogError::Network(reason)) => {
                tracing::warn!(%reason, "Using fallback model catalog");
                self.install_fallback();
                self.error(self.localizer.text(TextKey::ErrorLoadingModels).into_owned());
            }
        }
        self.catalog.state()
    }

    pub async fn resolve_timeout(
        &mut self,
        choice: TimeoutChoice,
    ) -> Result<CatalogState, SessionError> {
        if self.catalog.state() != CatalogState::AwaitingTimeoutChoice {
            return Err(SessionError::NoPendingPrompt);
        }
        tracing::debug!(?choice, "Catalog timeout prompt answered");
        match choice {
            TimeoutChoice::Retry => Ok(self.load_models().await),
            TimeoutChoice::Cancel | TimeoutChoice::Dismiss => {
                self.install_fallback();
                self.status = StatusLine::new();
                Ok(self.catalog.state())
            }
        }
    }

    fn install_fallback(&mut self) {
        self.catalog.install_fallback();
        self.reselect();
    }

    fn install_catalog(&mut self, models: Vec<pollen_types::ModelDescriptor>, source: CatalogSource) {
        self.catalog.install(models, source);
        self.reselect();
    }

    fn reselect(&mut self) {
        let selected = select_model(
            self.catalog.models(),
            self.settings.selected_model.as_deref(),
        );
        self.selected_model = Some(selected);
    }

    /// Pick a model. It must be in the catalog, except the default model.
    pub fn select_model(&mut self, name: &str) -> Result<(), SessionError> {
        if name != DEFAULT_MODEL && self.catalog.find(name).is_none() {
            return Err(SessionError::UnknownModel(name.to_string()));
        }
        self.selected_model = Some(name.to_string());
        self.settings.selected_model = Some(name.to_string());
        self.save_settings();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn set_temperature(&mut self, value: f32) -> Temperature {
        self.settings.temperature = Temperature::new(value);
        self.save_settings();
        self.settings.temperature
    }

    pub fn set_private(&mut self, private: bool) {
        self.settings.private = private;
        self.save_settings();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.save_settings();
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.localizer.set_language(language);
        self.save_settings();
    }

    fn save_settings(&mut self) {
        if let Err(e) = persistence::save_settings(
            self.store.as_mut(),
            self.language_store.as_mut(),
            &self.settings,
        ) {
            tracing::warn!("Failed to save settings: {e}");
        }
    }

    // ------------------------------------------------------------------
    // Staging
    // ------------------------------------------------------------------

    pub fn stage_file(&mut self, file: FileRef) -> Result<(), StageError> {
        let result = self.staging.stage(file);
        self.report_stage(result)
    }

    pub fn stage_path(&mut self, path: &Path) -> Result<(), StageError> {
        let result = self.staging.stage_path(path);
        self.report_stage(result)
    }

    fn report_stage(&mut self, result: Result<(), StageError>) -> Result<(), StageError> {
        if let Err(err) = &result {
            let text = match err {
                StageError::TooManyFiles => self.localizer.text(TextKey::MaxFiles).into_owned(),
                StageError::FileTooLarge { name, .. } => self
                    .localizer
                    .format(TextKey::FileTooLarge, &[("filename", name)]),
                StageError::Unreadable { name, .. } => self
                    .localizer
                    .format(TextKey::FileUnreadable, &[("filename", name)]),
            };
            self.error(text);
        }
        result
    }

    pub fn remove_staged(&mut self, index: usize) -> Option<FileRef> {
        self.staging.remove(index)
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    /// Send `text` plus the staged files and stream the reply.
    ///
    /// `on_update` receives the accumulated reply once per fragment. A
    /// stream that breaks after some text arrived still counts as a reply.
    pub async fn send<F>(&mut self, text: &str, mut on_update: F) -> Result<SendOutcome, ChatError>
    where
        F: FnMut(&str),
    {
        let typed = text.trim();
        if typed.is_empty() && self.staging.is_empty() {
            self.error(self.localizer.text(TextKey::EnterMessage).into_owned());
            return Err(ChatError::EmptyInput);
        }
        let Some(model) = self.selected_model.clone() else {
            self.error(self.localizer.text(TextKey::SelectModel).into_owned());
            return Err(ChatError::NoModelSelected);
        };

        let files = self.staging.take();
        let composed = compose_user_message(typed, &files, &self.localizer).await;
        self.transcript
            .push_user(typed, composed.attachments.clone());
        let user_message = Message::user_with_attachments(composed.content, composed.attachments);

        let request = ChatRequest::new(
            model,
            self.conversation.outgoing(&user_message),
            self.settings.temperature,
            self.settings.private,
        );
        self.info(TextKey::SendingRequest);

        let (tx, rx) = mpsc::channel(STREAM_EVENT_CHANNEL_CAPACITY);
        let client = self.client.clone();
        let idle_timeout = self.config.stream_idle_timeout;
        tokio::spawn(async move {
            stream_chat(&client, &request, tx, idle_timeout).await;
        });

        let mut reply = StreamingReply::new(rx);
        let finish = loop {
            let event = reply.next_event().await;
            let before = reply.fragments();
            if let Some(finish) = reply.apply_event(event) {
                break finish;
            }
            if reply.fragments() > before {
                if before == 0 {
                    self.info(TextKey::ReceivingResponse);
                }
                on_update(reply.content());
            }
        };

        let interrupted = match finish {
            StreamFinish::Done => None,
            StreamFinish::Error(err) if reply.fragments() > 0 => {
                tracing::warn!(%err, "Stream broke off; keeping partial reply");
                Some(err)
            }
            StreamFinish::Error(err) => {
                tracing::warn!(%err, "Send failed");
                let notice = format!(
                    "{}{err}",
                    self.localizer.text(TextKey::ErrorSendingMessage)
                );
                self.transcript.push_error(notice);
                self.persist();
                self.error(self.localizer.text(TextKey::SendError).into_owned());
                return Err(ChatError::from(err));
            }
        };

        let reply = reply.into_reply();
        let reply_text = reply.as_ref().map(|r| r.as_str().to_string());
        if let Some(text) = &reply_text {
            self.transcript.push_assistant(text.clone());
        }
        if let Err(e) = self.conversation.push_exchange(user_message, reply) {
            tracing::error!("Conversation rejected exchange: {e}");
        }
        self.persist();
        self.info(TextKey::ResponseReceived);

        Ok(SendOutcome {
            reply: reply_text,
            interrupted,
        })
    }

    fn persist(&mut self) {
        if let Err(e) = persistence::persist(self.store.as_mut(), &self.conversation, &self.transcript)
        {
            tracing::warn!("Failed to persist chat: {e}");
        }
    }

    // ------------------------------------------------------------------
    // Transcript actions
    // ------------------------------------------------------------------

    /// Wipe the stored chat, then the visible transcript and conversation.
    ///
    /// On a store failure nothing in memory changes.
    pub fn clear(&mut self, confirmation: ClearConfirmation) -> Result<(), StoreError> {
        if let Err(e) = persistence::clear(self.store.as_mut(), confirmation) {
            tracing::warn!("Failed to clear stored chat: {e}");
            self.error(self.localizer.text(TextKey::ClearError).into_owned());
            return Err(e);
        }
        self.transcript.clear();
        self.conversation.clear();
        self.info(TextKey::ChatCleared);
        Ok(())
    }

    #[must_use]
    pub fn export_transcript(&self) -> TranscriptExport {
        export_transcript(&self.transcript, &self.localizer, Local::now())
    }

    /// Write the transcript export into `dir`.
    pub async fn save_transcript(&mut self, dir: &Path) -> std::io::Result<PathBuf> {
        let export = self.export_transcript();
        let path = dir.join(&export.file_name);
        match tokio::fs::write(&path, export.contents.as_bytes()).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Chat saved");
                self.info(TextKey::ChatSaved);
                Ok(path)
            }
            Err(e) => {
                self.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Text of the last assistant reply. Sets an error status if none.
    pub fn last_response(&mut self) -> Option<String> {
        let text = self.transcript.last_response().map(str::to_string);
        if text.is_none() {
            self.error(self.localizer.text(TextKey::NoResponsesToCopy).into_owned());
        }
        text
    }

    /// Hand the last reply to `copy` and report the outcome on the status line.
    pub fn copy_last_response<E, F>(&mut self, copy: F) -> bool
    where
        E: std::fmt::Display,
        F: FnOnce(&str) -> Result<(), E>,
    {
        let Some(text) = self.last_response() else {
            return false;
        };
        match copy(&text) {
            Ok(()) => {
                self.info(TextKey::ResponseCopied);
                true
            }
            Err(e) => {
                tracing::warn!("Copy failed: {e}");
                self.error(self.localizer.text(TextKey::CopyError).into_owned());
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        let loc = &self.localizer;
        let (status, status_is_error) = match self.status.current() {
            Status::Ready => (loc.text(TextKey::Ready).into_owned(), false),
            Status::Info(text) => (text.clone(), false),
            Status::Error(text) => (text.clone(), true),
        };

        let model_groups = self
            .catalog
            .groups()
            .into_iter()
            .map(|group| ModelGroupView {
                label: loc.text(TextKey::for_category(group.category)).into_owned(),
                models: group.models,
            })
            .collect();

        let model_info = self
            .selected_model
            .as_deref()
            .and_then(|name| self.catalog.find(name))
            .map(|model| model_info(model, loc));

        let staged = self
            .staging
            .files()
            .iter()
            .enumerate()
            .map(|(index, file)| StagedFileView {
                index,
                display_name: file.display_name(),
                kind: file.kind(),
                size_bytes: file.size_bytes(),
            })
            .collect();

        let timeout_prompt = (self.catalog.state() == CatalogState::AwaitingTimeoutChoice).then(|| {
            TimeoutPromptView {
                title: loc.text(TextKey::ModelsTimeout).into_owned(),
                message: loc.text(TextKey::ModelsTimeoutMessage).into_owned(),
                retry_label: loc.text(TextKey::RetryButton).into_owned(),
                cancel_label: loc.text(TextKey::CancelButton).into_owned(),
            }
        });

        SessionView {
            title: loc.text(TextKey::Title).into_owned(),
            status,
            status_is_error,
            theme: self.settings.theme,
            temperature: self.settings.temperature,
            private: self.settings.private,
            language: self.settings.language,
            catalog_state: self.catalog.state(),
            model_groups,
            selected_model: self.selected_model.as_deref(),
            model_info,
            staged,
            transcript: self.transcript.entries(),
            timeout_prompt,
        }
    }
}
