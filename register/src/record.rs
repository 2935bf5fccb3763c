//! The citizen record: session gate, ledger and redaction mode together.

use std::sync::Arc;

use crate::config::RegisterConfig;
use crate::entropy::{EntropySource, RngEntropy};
use crate::ledger::IncidentLedger;
use crate::redaction::{self, RedactionMode, ViewModel};
use crate::repository::{LedgerRepository, ProfileRepository, SessionRepository};
use crate::scoring::ScoreReport;
use crate::session::{SessionError, SessionGate, SessionState};
use crate::store::{KeyValueStore, StoreError};
use crate::types::{AuthMethod, Incident, IncidentInput, Profile};

/// Error types for record operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Persistence failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Session gate refused the operation
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Owner-only action attempted from the public view
    #[error("Action requires the owner view; the record is currently redacted")]
    Redacted,
}

/// A citizen record as one user sees and edits it.
pub struct CitizenRecord {
    gate: SessionGate,
    ledger: IncidentLedger,
    mode: RedactionMode,
    entropy: Box<dyn EntropySource>,
}

impl CitizenRecord {
    /// Open a record over `store`, resuming any persisted session.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        config: &RegisterConfig,
        entropy: Box<dyn EntropySource>,
    ) -> Result<Self, RecordError> {
        let gate = SessionGate::restore(
            ProfileRepository::new(Arc::clone(&store)),
            SessionRepository::new(Arc::clone(&store)),
            config.identity.handle_length,
        )?;
        let ledger = IncidentLedger::load(LedgerRepository::new(store))?;

        Ok(Self {
            gate,
            ledger,
            mode: RedactionMode::from_redacted(config.redaction.redacted_by_default),
            entropy,
        })
    }

    /// Open a record with default configuration and OS entropy.
    pub fn with_defaults(store: Arc<dyn KeyValueStore>) -> Result<Self, RecordError> {
        Self::open(store, &RegisterConfig::default(), Box::new(RngEntropy::from_os()))
    }

    pub fn session(&self) -> SessionState {
        self.gate.state()
    }

    pub fn login(&mut self, method: AuthMethod) -> Result<SessionState, RecordError> {
        Ok(self.gate.login(method, self.entropy.as_mut())?)
    }

    /// The register defines no logout; always fails with [`SessionError::LogoutUnspecified`].
    pub fn logout(&mut self) -> Result<SessionState, RecordError> {
        Ok(self.gate.logout()?)
    }

    pub fn mode(&self) -> RedactionMode {
        self.mode
    }

    /// Flip between public and owner view. Never touches stored data.
    pub fn toggle_redaction(&mut self) -> RedactionMode {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = ?self.mode, "Redaction toggled");
        self.mode
    }

    pub fn set_mode(&mut self, mode: RedactionMode) {
        self.mode = mode;
    }

    pub fn profile(&self) -> Result<Option<Profile>, RecordError> {
        Ok(self.gate.profile()?)
    }

    pub fn ledger(&self) -> &IncidentLedger {
        &self.ledger
    }

    /// Project the record in the current mode.
    pub fn view(&self) -> Result<ViewModel, RecordError> {
        let profile = self.gate.profile()?;
        Ok(redaction::project(
            profile.as_ref(),
            self.ledger.incidents(),
            self.mode,
        ))
    }

    pub fn report(&self) -> ScoreReport {
        self.ledger.report()
    }

    pub fn add_incident(&mut self, input: IncidentInput) -> Result<Option<Incident>, RecordError> {
        Ok(self.ledger.add_incident(input, self.entropy.as_mut())?)
    }

    /// Delete an incident. Only available in the owner view.
    pub fn remove_incident(&mut self, id: &str) -> Result<Option<Incident>, RecordError> {
        self.require_owner()?;
        Ok(self.ledger.remove_incident(id)?)
    }

    /// Edit the display name. Only available in the owner view.
    pub fn rename(&mut self, name: &str) -> Result<Option<Profile>, RecordError> {
        self.require_owner()?;
        Ok(self.gate.rename(name)?)
    }

    fn require_owner(&self) -> Result<(), RecordError> {
        if self.mode.is_redacted() {
            return Err(RecordError::Redacted);
        }
        Ok(())
    }
}
