//! Key/value preference storage.
//!
//! The session only sees [`SettingsStore`]; values are plain JSON so any
//! backend that can hold strings can implement it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::atomic_write::{AtomicWriteOptions, atomic_write};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode store value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Write several keys as one update.
    fn set_many(&mut self, entries: Vec<(&str, Value)>) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove several keys as one update.
    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten atomically on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    options: AtomicWriteOptions,
}

impl JsonFileStore {
    /// Load `path`, starting empty when it does not exist.
    ///
    /// A file that is not a JSON object is treated as empty and will be
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, Value>>(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Ignoring corrupt store file: {e}");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        Ok(Self {
            path,
            values,
            options: AtomicWriteOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: AtomicWriteOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.values)?;
        atomic_write(&self.path, &bytes, self.options).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn set_many(&mut self, entries: Vec<(&str, Value)>) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.values.insert(key.to_string(), value);
        }
        self.flush()
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let mut changed = false;
        for key in keys {
            changed |= self.values.remove(*key).is_some();
        }
        if changed {
            self.flush()?;
        }
        Ok(())
    }
}
