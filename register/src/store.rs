//! Key-value persistence for register state.
//!
//! The register persists a handful of named JSON records. [`KeyValueStore`] is
//! the injected seam; [`MemoryStore`] serves tests and ephemeral sessions,
//! [`FileStore`] keeps one JSON document per key in a data directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Error types for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A writer panicked while holding the lock
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Named records persisted by the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Profile,
    Incidents,
    Session,
    AuthMethod,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Incidents => "incidents",
            Self::Session => "session",
            Self::AuthMethod => "authMethod",
        }
    }
}

/// Synchronous key-value store over named string records.
///
/// Writes are last-write-wins; there is no transaction spanning keys.
pub trait KeyValueStore: Send + Sync {
    /// Read a raw value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a raw value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Check whether a value exists.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Read and decode a JSON record.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<Option<T>, StoreError> {
    match store.get(key.as_str())? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON record.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key.as_str(), &raw)
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each key lives in `<dir>/<key>.json`.
///
/// Values are written to a temporary sibling and renamed into place, so a
/// single record is never observed half-written.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self {
            dir,
            lock: RwLock::new(()),
        })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.read().map_err(|_| StoreError::Poisoned)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.write().map_err(|_| StoreError::Poisoned)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.write().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("profile", "{}").unwrap();
        assert_eq!(store.get("profile").unwrap().as_deref(), Some("{}"));
        assert!(store.contains("profile").unwrap());

        store.remove("profile").unwrap();
        store.remove("profile").unwrap();
        assert!(store.get("profile").unwrap().is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            write_json(&store, StoreKey::AuthMethod, "GOOGLE").unwrap();
            store.set(StoreKey::Session.as_str(), "true").unwrap();
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        let method: Option<String> = read_json(&reopened, StoreKey::AuthMethod).unwrap();
        assert_eq!(method.as_deref(), Some("GOOGLE"));
        assert!(reopened.contains("session").unwrap());
        assert!(dir.path().join("authMethod.json").exists());

        reopened.remove("session").unwrap();
        assert!(!reopened.contains("session").unwrap());
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let store = MemoryStore::new();
        store.set(StoreKey::Incidents.as_str(), "not json").unwrap();

        let result: Result<Option<Vec<String>>, _> = read_json(&store, StoreKey::Incidents);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
