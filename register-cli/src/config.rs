//! Configuration file for the CLI.
//!
//! One YAML document with a `register` and an `advisor` section. Both are
//! optional; a missing file means defaults everywhere.

use advisor::AdvisorConfig;
use register::RegisterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub register: RegisterConfig,
    pub advisor: AdvisorConfig,
}

impl Config {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.advisor.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor::Provider;
    use register::config::StorageBackend;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.register.storage.backend, StorageBackend::File);
        assert_eq!(config.advisor.provider, Provider::Gemini);
    }

    #[test]
    fn test_sections_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trust-register.yaml");
        std::fs::write(
            &path,
            "register:\n  storage:\n    backend: memory\nadvisor:\n  provider: mock\n",
        )
        .unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.register.storage.backend, StorageBackend::Memory);
        assert_eq!(config.register.identity.handle_length, 10);
        assert_eq!(config.advisor.provider, Provider::Mock);
    }

    #[test]
    fn test_invalid_advisor_section_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "advisor:\n  temperature: 9.0\n").unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }
}
