//! Model catalog domain types and display categorization.

use serde::{Deserialize, Serialize};

/// Selected when the stored choice is missing from the catalog.
///
/// Selecting it is tolerated even when the catalog does not list it.
pub const DEFAULT_MODEL: &str = "openai";

/// Models always grouped under [`ModelCategory::Recommended`].
pub const RECOMMENDED_MODELS: &[&str] = &["openai", "claude-hybridspace", "openai-large"];

/// One entry of the provider's `/models` listing.
///
/// Unknown fields are ignored and missing flags default to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vision: bool,
    #[serde(default)]
    pub audio: bool,
    #[serde(default)]
    pub tools: bool,
    #[serde(default)]
    pub reasoning: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            vision: false,
            audio: false,
            tools: false,
            reasoning: false,
            tier: None,
        }
    }

    #[must_use]
    pub fn with_vision(mut self) -> Self {
        self.vision = true;
        self
    }

    #[must_use]
    pub fn with_audio(mut self) -> Self {
        self.audio = true;
        self
    }

    #[must_use]
    pub fn with_tools(mut self) -> Self {
        self.tools = true;
        self
    }

    #[must_use]
    pub fn with_reasoning(mut self) -> Self {
        self.reasoning = true;
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    /// Label for pickers: the description, or the name when it is blank.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        }
    }

    #[must_use]
    pub fn category(&self) -> ModelCategory {
        ModelCategory::of(self)
    }

    /// Advertised capabilities in display order.
    #[must_use]
    pub fn features(&self) -> Vec<ModelFeature> {
        let mut features = Vec::new();
        if self.vision {
            features.push(ModelFeature::Images);
        }
        if self.audio {
            features.push(ModelFeature::Audio);
        }
        if self.tools {
            features.push(ModelFeature::Functions);
        }
        if self.reasoning {
            features.push(ModelFeature::Reasoning);
        }
        features
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFeature {
    Images,
    Audio,
    Functions,
    Reasoning,
}

/// Display grouping of the model picker.
///
/// Variant order is the order groups are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelCategory {
    Recommended,
    Images,
    TextOnly,
    Audio,
}

impl ModelCategory {
    pub const ALL: [ModelCategory; 4] = [
        ModelCategory::Recommended,
        ModelCategory::Images,
        ModelCategory::TextOnly,
        ModelCategory::Audio,
    ];

    /// First match wins: allowlist, then vision, then audio, then text only.
    #[must_use]
    pub fn of(model: &ModelDescriptor) -> Self {
        if RECOMMENDED_MODELS.contains(&model.name.as_str()) {
            ModelCategory::Recommended
        } else if model.vision {
            ModelCategory::Images
        } else if model.audio {
            ModelCategory::Audio
        } else {
            ModelCategory::TextOnly
        }
    }
}

/// A non-empty picker group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGroup<'a> {
    pub category: ModelCategory,
    pub models: Vec<&'a ModelDescriptor>,
}

/// Group `models` for display. Empty groups are omitted; catalog order is
/// kept within a group.
#[must_use]
pub fn group_models(models: &[ModelDescriptor]) -> Vec<ModelGroup<'_>> {
    ModelCategory::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<_> = models.iter().filter(|m| m.category() == category).collect();
            (!members.is_empty()).then_some(ModelGroup {
                category,
                models: members,
            })
        })
        .collect()
}

/// Hardcoded catalog used when the provider cannot be reached.
#[must_use]
pub fn fallback_catalog() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("openai", "OpenAI GPT (Default)")
            .with_vision()
            .with_tools(),
        ModelDescriptor::new("claude-hybridspace", "Claude (Vision)").with_vision(),
        ModelDescriptor::new("openai-large", "OpenAI Large (Vision)").with_vision(),
    ]
}

/// Keep the stored choice if the catalog lists it, otherwise [`DEFAULT_MODEL`].
#[must_use]
pub fn select_model(models: &[ModelDescriptor], stored: Option<&str>) -> String {
    match stored {
        Some(name) if models.iter().any(|m| m.name == name) => name.to_string(),
        _ => DEFAULT_MODEL.to_string(),
    }
}
