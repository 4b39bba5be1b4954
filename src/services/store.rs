//! Key-value store for survey data.
//!
//! Provides:
//! - A minimal `Store` contract (`load` / `save` of JSON values)
//! - Typed access via serde on top of any store
//! - An in-memory store and a single-file JSON store
//! - Standard key builders

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store value is not valid JSON for its key: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator. An absent key is `Ok(None)`, never an error.
pub trait Store: Send + Sync {
    fn load(&self, key: &str) -> StoreResult<Option<Value>>;

    fn save(&self, key: &str, value: &Value) -> StoreResult<()>;

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.load(key)?.is_some())
    }
}

/// Typed helpers for any [`Store`].
pub trait StoreExt: Store {
    /// Get a value and deserialize it.
    #[instrument(skip(self), fields(store_hit))]
    fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.load(key)? {
            Some(raw) => {
                debug!(key = key, "Store hit");
                tracing::Span::current().record("store_hit", true);
                Ok(Some(serde_json::from_value(raw)?))
            }
            None => {
                debug!(key = key, "Store miss");
                tracing::Span::current().record("store_hit", false);
                Ok(None)
            }
        }
    }

    /// Serialize a value and save it.
    #[instrument(skip(self, value))]
    fn put<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_value(value)?;
        self.save(key, &raw)?;
        debug!(key = key, "Stored value");
        Ok(())
    }

    /// Save only when the key is absent. Returns whether a write happened.
    fn put_if_absent<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<bool> {
        if self.contains(key)? {
            debug!(key = key, "Key present, keeping existing value");
            return Ok(false);
        }
        self.put(key, value)?;
        Ok(true)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.entries.write().insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// All keys in one JSON object on disk, rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Open a store file; a missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(body) if body.trim().is_empty() => BTreeMap::new(),
            Ok(body) => serde_json::from_str(&body)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "JSON store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write then rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> StoreResult<()> {
        let mut entries = self.entries.write();
        let previous = entries.insert(key.to_string(), value.clone());
        if let Err(e) = self.flush(&entries) {
            // Keep memory in step with disk
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// Store key builders for consistent key formats.
pub mod keys {
    pub const CLIENTS: &str = "clients";
    pub const SURVEYS: &str = "surveys";
    pub const RESPONSES: &str = "responses";

    /// Grade for one question
    pub fn grade(question_id: &str) -> String {
        format!("grade:{}", question_id)
    }
}
