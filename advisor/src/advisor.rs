//! The advisor collaborator: topic and user text in, critique out.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::{CompletionBackend, CompletionRequest, LlmError};
use crate::prompt::PromptBuilder;
use crate::topic::Topic;

/// Error types for the advisor.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// Backend error
    #[error("Backend error: {0}")]
    Backend(#[from] LlmError),

    /// The backend answered with nothing usable
    #[error("Empty completion from {backend}")]
    EmptyCompletion { backend: String },
}

/// Produces advisory text for a topic.
///
/// `user_text` is `None` for the opening analysis of a topic.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn generate(&self, topic: &Topic, user_text: Option<&str>) -> Result<String, AdvisorError>;
}

/// [`Advisor`] backed by a completion service.
pub struct BackendAdvisor {
    backend: Arc<dyn CompletionBackend>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl BackendAdvisor {
    /// Create an advisor over `backend` with provider defaults.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Cap the length of each answer.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Id of the underlying backend.
    pub fn backend_id(&self) -> &str {
        self.backend.id()
    }

    fn request_for(&self, topic: &Topic, user_text: Option<&str>) -> CompletionRequest {
        let mut request = CompletionRequest::user(PromptBuilder::build(topic, user_text))
            .with_system(PromptBuilder::system_prompt());
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

#[async_trait]
impl Advisor for BackendAdvisor {
    async fn generate(&self, topic: &Topic, user_text: Option<&str>) -> Result<String, AdvisorError> {
        let request = self.request_for(topic, user_text);
        debug!(
            backend = self.backend.id(),
            topic = topic.title(),
            interpellation = user_text.is_some(),
            "Requesting advisory completion"
        );

        let response = self.backend.complete(request).await?;
        let content = response.content.trim();

        if content.is_empty() {
            return Err(AdvisorError::EmptyCompletion {
                backend: self.backend.id().to_string(),
            });
        }

        info!(
            backend = self.backend.id(),
            tokens = response.usage.total(),
            finish_reason = ?response.finish_reason,
            "Advisory completion received"
        );
        Ok(content.to_string())
    }
}
