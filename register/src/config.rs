//! Configuration for the register.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::entropy::DEFAULT_HANDLE_LENGTH;
use crate::store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Configuration for a register instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Where state is persisted
    pub storage: StorageConfig,
    /// Identity generation settings
    pub identity: IdentityConfig,
    /// Presentation defaults
    pub redaction: RedactionConfig,
}

impl RegisterConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Open the configured store.
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let store: Arc<dyn KeyValueStore> = match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::open(&self.storage.data_dir)?),
        };
        Ok(store)
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives the process
    Memory,
    /// One JSON file per key under `data_dir`
    #[default]
    File,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the file backend
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from(".trust-register"),
        }
    }
}

/// Identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Length of generated public handles
    pub handle_length: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            handle_length: DEFAULT_HANDLE_LENGTH,
        }
    }
}

/// Redaction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Whether a freshly loaded record starts in the public view
    pub redacted_by_default: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redacted_by_default: true,
        }
    }
}
