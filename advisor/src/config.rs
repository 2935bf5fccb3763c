//! Configuration for the advisor.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::advisor::BackendAdvisor;
use crate::backend::gemini::{API_KEY_ENV, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use crate::backend::{CompletionBackend, GeminiBackend, MockBackend, OpenAiBackend};

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which completion service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
    /// Canned replies, no network
    Mock,
}

/// Advisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub provider: Provider,
    /// API root; provider default when unset
    pub base_url: Option<String>,
    /// Model name; provider default when unset
    pub model: Option<String>,
    /// Inline key. Prefer `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the key
    pub api_key_env: String,
    /// Maximum tokens per answer
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Canned reply for the mock provider
    pub mock_response: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            base_url: None,
            model: None,
            api_key: None,
            api_key_env: API_KEY_ENV.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            mock_response: "The register converts a private debt into a public verdict.".to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                field: "temperature",
                reason: format!("{} is outside 0.0 - 2.0", self.temperature),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "max_tokens",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Key from config, falling back to the environment.
    fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
    }

    /// Build the configured backend.
    pub fn build_backend(&self) -> Arc<dyn CompletionBackend> {
        match self.provider {
            Provider::Gemini => Arc::new(GeminiBackend::new(
                self.base_url.as_deref().unwrap_or(GEMINI_BASE_URL),
                self.model.as_deref().unwrap_or(GEMINI_DEFAULT_MODEL),
                self.resolve_api_key(),
            )
            .with_key_source(&self.api_key_env)),
            Provider::OpenAi => Arc::new(OpenAiBackend::new(
                self.base_url.as_deref().unwrap_or("https://api.openai.com/v1"),
                self.model.as_deref().unwrap_or("gpt-4o-mini"),
                self.resolve_api_key(),
            )),
            Provider::Mock => Arc::new(
                MockBackend::new(self.model.as_deref().unwrap_or("mock-model"))
                    .with_response(self.mock_response.clone()),
            ),
        }
    }

    /// Build an advisor over the configured backend.
    pub fn build_advisor(&self) -> BackendAdvisor {
        BackendAdvisor::new(self.build_backend())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_key_env, "API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = AdvisorConfig {
            provider: Provider::OpenAi,
            model: Some("llama3.2".to_string()),
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..Default::default()
        };

        let yaml = config.to_yaml().unwrap();
        let parsed = AdvisorConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.provider, Provider::OpenAi);
        assert_eq!(parsed.model.as_deref(), Some("llama3.2"));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = AdvisorConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.yaml");
        std::fs::write(&path, "provider: mock\nmax_tokens: 64\n").unwrap();

        let config = AdvisorConfig::load(&path).unwrap();
        assert_eq!(config.provider, Provider::Mock);
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.build_backend().id(), "mock-model");
    }

    #[tokio::test]
    async fn test_gemini_without_key_is_unavailable() {
        let config = AdvisorConfig {
            api_key_env: "TRUST_REGISTER_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        let backend = config.build_backend();
        assert_eq!(backend.id(), GEMINI_DEFAULT_MODEL);
        assert!(!backend.is_available().await);
    }
}
