//! Model catalog held by a session.

use pollen_types::{
    Localizer, ModelDescriptor, ModelGroup, TextKey, fallback_catalog, group_models,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    /// Nothing installed yet.
    Loading,
    Loaded(CatalogSource),
    /// The last fetch timed out; the user must pick a [`TimeoutChoice`].
    AwaitingTimeoutChoice,
}

/// Answers to the catalog timeout prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutChoice {
    Retry,
    Cancel,
    /// Closing the prompt without choosing. Same as `Cancel`.
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
    state: CatalogState,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            state: CatalogState::Loading,
        }
    }
}

impl ModelCatalog {
    #[must_use]
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    #[must_use]
    pub const fn state(&self) -> CatalogState {
        self.state
    }

    #[must_use]
    pub fn groups(&self) -> Vec<ModelGroup<'_>> {
        group_models(&self.models)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Replace the whole catalog.
    pub fn install(&mut self, models: Vec<ModelDescriptor>, source: CatalogSource) {
        self.models = models;
        self.state = CatalogState::Loaded(source);
    }

    pub fn install_fallback(&mut self) {
        self.install(fallback_catalog(), CatalogSource::Fallback);
    }

    pub fn await_timeout_choice(&mut self) {
        self.state = CatalogState::AwaitingTimeoutChoice;
    }
}

/// Capabilities joined with " • ", plus " (tier)" when a tier is known.
#[must_use]
pub fn model_info(model: &ModelDescriptor, localizer: &dyn Localizer) -> String {
    let features: Vec<String> = model
        .features()
        .into_iter()
        .map(|feature| localizer.text(TextKey::for_feature(feature)).into_owned())
        .collect();
    let mut info = features.join(" • ");
    if let Some(tier) = &model.tier {
        info.push_str(&format!(" ({tier})"));
    }
    info
}
