//! Advisor - critical dialogue about the register
//!
//! Provides:
//! - Trait-based completion backends (Gemini, OpenAI-compatible, mock)
//! - A static catalogue of debate challenges and freeform topics
//! - Prompt assembly for a critical sociologist persona
//! - An append-only dialogue with a single in-flight request
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            AdvisoryDialogue             │
//! │   (transcript, busy flag, topic)        │
//! └────────────────┬────────────────────────┘
//!                  ▼
//!       ┌───────────────────────┐
//!       │   Advisor             │
//!       │ (BackendAdvisor +     │
//!       │  PromptBuilder)       │
//!       └──────────┬────────────┘
//!                  ▼
//!      ┌─────────────────────┐
//!      │  CompletionBackend  │
//!      │ (Gemini/OpenAI/Mock)│
//!      └─────────────────────┘
//! ```

pub mod advisor;
pub mod backend;
pub mod config;
pub mod dialogue;
pub mod prompt;
pub mod topic;

// Re-export main types for convenience
pub use advisor::{Advisor, AdvisorError, BackendAdvisor};
pub use backend::{CompletionBackend, CompletionRequest, CompletionResponse, LlmError};
pub use config::{AdvisorConfig, ConfigError, Provider};
pub use dialogue::{AdvisoryDialogue, IgnoreReason, SendOutcome, Turn, TurnRole};
pub use prompt::PromptBuilder;
pub use topic::{CatalogueSummary, Category, Challenge, FreeformContext, Topic};
