//! User preference value types.
//!
//! Each type validates at its parse boundary; holding one means it is usable.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}'; expected one of: {expected:?}")]
pub struct SettingParseError {
    kind: &'static str,
    raw: String,
    expected: &'static [&'static str],
}

impl SettingParseError {
    fn new(kind: &'static str, raw: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Blue,
    Green,
}

const THEME_VALUES: &[&str] = &["dark", "light", "blue", "green"];

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Blue => "blue",
            Theme::Green => "green",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, SettingParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "blue" => Ok(Theme::Blue),
            "green" => Ok(Theme::Green),
            _ => Err(SettingParseError::new("theme", raw, THEME_VALUES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

const LANGUAGE_VALUES: &[&str] = &["en", "ru"];

impl Language {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, SettingParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ru" | "russian" => Ok(Language::Ru),
            _ => Err(SettingParseError::new("language", raw, LANGUAGE_VALUES)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sampling temperature, always within `[0, 2]`.
///
/// Out-of-range input is clamped rather than rejected; NaN becomes the default.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE))
    }

    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(DEFAULT_TEMPERATURE)
    }
}

impl From<f32> for Temperature {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(value: Temperature) -> Self {
        value.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All persisted user preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    pub temperature: Temperature,
    /// Keep requests out of the provider's public feed.
    pub private: bool,
    pub selected_model: Option<String>,
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            temperature: Temperature::default(),
            private: true,
            selected_model: None,
            language: Language::default(),
        }
    }
}
