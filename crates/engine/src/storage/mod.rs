//! Durable key-value string storage.
//!
//! Values are opaque strings addressed by a short key. The file-backed store keeps one
//! file per key under a directory; the in-memory store backs tests and headless runs.

mod atomic_io;
mod keys;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use self::atomic_io::write_text_atomic;
use self::keys::validate_store_key;

pub use keys::StoreKeyError;

const VALUE_FILE_EXTENSION: &str = "kv";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid store key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: StoreKeyError,
    },
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_store_key(key).map_err(|source| StorageError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        Ok(self.dir.join(format!("{key}.{VALUE_FILE_EXTENSION}")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        write_text_atomic(&path, value).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(key, path = %path.display(), bytes = value.len(), "store_value_written");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_store_key(key).map_err(|source| StorageError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_store_key(key).map_err(|source| StorageError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
