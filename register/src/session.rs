//! Session / authentication gate.
//!
//! A two-state machine: `Unauthenticated` until the first login, then
//! `Authenticated` for the rest of the process. Logging in with a federated
//! method creates the profile on first use and leaves it untouched
//! afterwards; anonymous login discards any persisted identity.

use crate::entropy::EntropySource;
use crate::repository::{ProfileRepository, SessionRepository};
use crate::store::StoreError;
use crate::types::{AuthMethod, Profile};

/// Error types for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Persistence failed
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),

    /// No logout transition is defined for the gate
    #[error("Logout is not defined for this register")]
    LogoutUnspecified,

    /// Operation requires a signed-in user
    #[error("No active session")]
    NotAuthenticated,

    /// Operation requires a persisted profile
    #[error("No profile exists for this session")]
    NoProfile,
}

/// State of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated { method: AuthMethod },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn method(&self) -> Option<AuthMethod> {
        match self {
            Self::Authenticated { method } => Some(*method),
            Self::Unauthenticated => None,
        }
    }
}

/// Decides whether the identity store is created, reused or wiped.
pub struct SessionGate {
    state: SessionState,
    profiles: ProfileRepository,
    sessions: SessionRepository,
    handle_length: usize,
}

impl SessionGate {
    /// Create a gate in the `Unauthenticated` state.
    pub fn new(
        profiles: ProfileRepository,
        sessions: SessionRepository,
        handle_length: usize,
    ) -> Self {
        Self {
            state: SessionState::Unauthenticated,
            profiles,
            sessions,
            handle_length,
        }
    }

    /// Create a gate resuming any session marker left in the store.
    pub fn restore(
        profiles: ProfileRepository,
        sessions: SessionRepository,
        handle_length: usize,
    ) -> Result<Self, SessionError> {
        let mut gate = Self::new(profiles, sessions, handle_length);
        if let Some(method) = gate.sessions.active_method()? {
            tracing::debug!(%method, "Restored session");
            gate.state = SessionState::Authenticated { method };
        }
        Ok(gate)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Log in with `method`. Always ends in `Authenticated`.
    pub fn login(
        &mut self,
        method: AuthMethod,
        entropy: &mut dyn EntropySource,
    ) -> Result<SessionState, SessionError> {
        self.sessions.record(method)?;

        if method.is_federated() {
            if self.profiles.exists()? {
                tracing::debug!(%method, "Reusing existing profile");
            } else {
                let profile = Profile {
                    name: method.default_display_name().to_string(),
                    external_ref: entropy.external_ref(),
                    public_handle: entropy.public_handle(self.handle_length),
                };
                self.profiles.save(&profile)?;
                tracing::info!(%method, handle = %profile.public_handle, "Created profile");
            }
        } else {
            self.profiles.clear()?;
            tracing::info!("Anonymous login, identity discarded");
        }

        self.state = SessionState::Authenticated { method };
        Ok(self.state)
    }

    /// There is no transition back to `Unauthenticated`.
    pub fn logout(&mut self) -> Result<SessionState, SessionError> {
        Err(SessionError::LogoutUnspecified)
    }

    /// The persisted profile, if any.
    pub fn profile(&self) -> Result<Option<Profile>, SessionError> {
        Ok(self.profiles.load()?)
    }

    /// Change the profile's display name.
    ///
    /// Blank names are ignored and return `Ok(None)`.
    pub fn rename(&mut self, name: &str) -> Result<Option<Profile>, SessionError> {
        if !self.state.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let mut profile = self.profiles.load()?.ok_or(SessionError::NoProfile)?;
        profile.name = name.to_string();
        self.profiles.save(&profile)?;
        tracing::info!("Profile renamed");
        Ok(Some(profile))
    }
}
