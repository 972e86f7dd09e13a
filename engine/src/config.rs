//! `~/.pollen/config.toml` loading and resolution into a [`SessionConfig`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use thiserror::Error;

use pollen_providers::{DEFAULT_BASE_URL, DEFAULT_CATALOG_TIMEOUT, DEFAULT_STREAM_IDLE_TIMEOUT};

/// Overrides `[provider] base_url` when set.
pub const BASE_URL_ENV: &str = "POLLEN_BASE_URL";

const APP_DIR: &str = ".pollen";
const STORE_FILE: &str = "store.json";
const LANGUAGE_STORE_FILE: &str = "language.json";

#[derive(Debug, Default, Deserialize)]
pub struct PollenConfig {
    pub provider: Option<ProviderConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    /// Seconds before the model catalog prompt appears. Default: 20.
    pub catalog_timeout_secs: Option<u64>,
    /// Seconds of body silence before a reply counts as interrupted. Default: 60.
    pub stream_idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Settings and chat store. `${VAR}` references are expanded.
    pub path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Everything a session needs, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub base_url: String,
    pub catalog_timeout: Duration,
    pub stream_idle_timeout: Duration,
    pub store_path: PathBuf,
    /// Language is scoped apart from the other settings.
    pub language_store_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        PollenConfig::default().resolve_with(None)
    }
}

impl PollenConfig {
    /// Load `~/.pollen/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Resolve with the `POLLEN_BASE_URL` environment override applied.
    #[must_use]
    pub fn resolve(&self) -> SessionConfig {
        let from_env = env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        self.resolve_with(from_env)
    }

    #[must_use]
    pub fn resolve_with(&self, base_url_override: Option<String>) -> SessionConfig {
        let provider = self.provider.as_ref();
        let base_url = base_url_override
            .or_else(|| provider.and_then(|p| p.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let catalog_timeout = provider
            .and_then(|p| p.catalog_timeout_secs)
            .map_or(DEFAULT_CATALOG_TIMEOUT, seconds_at_least_one);
        let stream_idle_timeout = provider
            .and_then(|p| p.stream_idle_timeout_secs)
            .map_or(DEFAULT_STREAM_IDLE_TIMEOUT, seconds_at_least_one);

        let store_path = self
            .storage
            .as_ref()
            .and_then(|s| s.path.as_deref())
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
            .unwrap_or_else(|| app_dir().join(STORE_FILE));
        let language_store_path = store_path.with_file_name(LANGUAGE_STORE_FILE);

        SessionConfig {
            base_url,
            catalog_timeout,
            stream_idle_timeout,
            store_path,
            language_store_path,
        }
    }
}

fn seconds_at_least_one(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

/// Replace `${VAR}` with the variable's value (empty when unset).
///
/// An unclosed `${` is kept literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn app_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(APP_DIR), |home| home.join(APP_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join("config.toml"))
}

/// Directory for the log file.
#[must_use]
pub fn log_dir() -> PathBuf {
    app_dir().join("logs")
}
