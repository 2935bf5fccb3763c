//! Typed repositories over the key-value store.
//!
//! Each repository owns one aggregate (profile, ledger, session marker) and
//! exposes explicit `exists`/`load`/`save`/`clear` operations instead of raw
//! reads. Profile and ledger writes are independent; a crash between them can
//! leave the two records out of step.

use std::sync::Arc;

use crate::store::{read_json, write_json, KeyValueStore, StoreError, StoreKey};
use crate::types::{AuthMethod, Incident, Profile};

/// Persisted citizen profile.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn exists(&self) -> Result<bool, StoreError> {
        self.store.contains(StoreKey::Profile.as_str())
    }

    /// Load the profile. Legacy records without a handle get the fallback pseudonym.
    pub fn load(&self) -> Result<Option<Profile>, StoreError> {
        read_json(self.store.as_ref(), StoreKey::Profile)
    }

    pub fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), StoreKey::Profile, profile)?;
        tracing::debug!(handle = %profile.public_handle, "Saved profile");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(StoreKey::Profile.as_str())?;
        tracing::debug!("Cleared profile");
        Ok(())
    }
}

/// Persisted incident ledger, stored as one ordered array.
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LedgerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the ledger; a missing record is an empty ledger.
    pub fn load(&self) -> Result<Vec<Incident>, StoreError> {
        Ok(read_json(self.store.as_ref(), StoreKey::Incidents)?.unwrap_or_default())
    }

    pub fn save(&self, incidents: &[Incident]) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), StoreKey::Incidents, incidents)?;
        tracing::debug!(count = incidents.len(), "Saved ledger");
        Ok(())
    }
}

/// Persisted session marker and last login method.
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The method of the active session, if one is recorded.
    pub fn active_method(&self) -> Result<Option<AuthMethod>, StoreError> {
        if !self.store.contains(StoreKey::Session.as_str())? {
            return Ok(None);
        }
        read_json(self.store.as_ref(), StoreKey::AuthMethod)
    }

    pub fn record(&self, method: AuthMethod) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), StoreKey::Session, &true)?;
        write_json(self.store.as_ref(), StoreKey::AuthMethod, &method)
    }
}
