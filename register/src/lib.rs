//! Trust Register - citizen record simulation
//!
//! Models a fictional public "reliability register":
//! - Identity store with a stable pseudonymous public handle
//! - Incident ledger (debts and claims), most recent first
//! - Reliability scoring, recomputed from the ledger on every read
//! - Public/owner redaction of what a renderer may show
//! - A session gate deciding when identities are created or discarded
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │               CitizenRecord                │
//! └──────┬───────────────┬──────────────┬──────┘
//!        ▼               ▼              ▼
//! ┌─────────────┐ ┌──────────────┐ ┌───────────┐
//! │ SessionGate │ │IncidentLedger│ │ redaction │
//! └──────┬──────┘ └──────┬───────┘ └───────────┘
//!        ▼               ▼
//! ┌──────────────────────────────┐
//! │ KeyValueStore (memory/file)  │
//! └──────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use register::{AuthMethod, CitizenRecord, IncidentInput, IncidentStatus, MemoryStore};
//!
//! let mut record = CitizenRecord::with_defaults(Arc::new(MemoryStore::new())).unwrap();
//! record.login(AuthMethod::Anonymous).unwrap();
//! record
//!     .add_incident(
//!         IncidentInput::titled("Rent")
//!             .with_amount(200.0)
//!             .with_status(IncidentStatus::Pending),
//!     )
//!     .unwrap();
//! assert_eq!(record.report().score, 93);
//! ```

pub mod config;
pub mod entropy;
pub mod ledger;
pub mod record;
pub mod redaction;
pub mod repository;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;

// Re-export main types
pub use config::RegisterConfig;
pub use entropy::{EntropySource, RngEntropy};
pub use ledger::IncidentLedger;
pub use record::{CitizenRecord, RecordError};
pub use redaction::{project, IdentityView, IncidentView, RedactionMode, ViewModel};
pub use repository::{LedgerRepository, ProfileRepository, SessionRepository};
pub use scoring::{compute_score, ScoreBand, ScoreReport};
pub use session::{SessionError, SessionGate, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreKey};
pub use types::*;
