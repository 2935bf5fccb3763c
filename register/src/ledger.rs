//! The incident ledger.
//!
//! An ordered, most-recent-first collection of incidents. Every mutation
//! writes the whole ledger back to the store.

use chrono::Utc;

use crate::entropy::EntropySource;
use crate::repository::LedgerRepository;
use crate::scoring::{self, ScoreReport};
use crate::store::StoreError;
use crate::types::{sanitize_amount, Incident, IncidentInput};

/// Ordered collection of incidents backed by a [`LedgerRepository`].
pub struct IncidentLedger {
    incidents: Vec<Incident>,
    repo: LedgerRepository,
}

impl IncidentLedger {
    /// Load the ledger from its repository.
    pub fn load(repo: LedgerRepository) -> Result<Self, StoreError> {
        let incidents = repo.load()?;
        tracing::debug!(count = incidents.len(), "Loaded ledger");
        Ok(Self { incidents, repo })
    }

    /// Record a new incident at the head of the ledger.
    ///
    /// Returns `Ok(None)` without touching the ledger when the title is blank.
    pub fn add_incident(
        &mut self,
        input: IncidentInput,
        entropy: &mut dyn EntropySource,
    ) -> Result<Option<Incident>, StoreError> {
        let title = input.title.trim();
        if title.is_empty() {
            tracing::debug!("Ignoring incident with blank title");
            return Ok(None);
        }

        let mut id = entropy.incident_id();
        while self.contains(&id) {
            id = entropy.incident_id();
        }

        let incident = Incident {
            id,
            date: Utc::now(),
            title: title.to_string(),
            description: input.description,
            amount: sanitize_amount(input.amount),
            status: input.status.unwrap_or_default(),
            score_impact: entropy.score_impact(),
        };

        self.incidents.insert(0, incident.clone());
        self.repo.save(&self.incidents)?;

        tracing::info!(
            incident_id = %incident.id,
            status = %incident.status,
            amount = incident.amount,
            "Incident recorded"
        );
        Ok(Some(incident))
    }

    /// Remove the incident with `id`. Unknown ids are a no-op.
    pub fn remove_incident(&mut self, id: &str) -> Result<Option<Incident>, StoreError> {
        let removed = self
            .incidents
            .iter()
            .position(|i| i.id == id)
            .map(|index| self.incidents.remove(index));

        self.repo.save(&self.incidents)?;

        match &removed {
            Some(incident) => tracing::info!(incident_id = %incident.id, "Incident removed"),
            None => tracing::debug!(incident_id = %id, "No incident to remove"),
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Incidents, most recent first.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Sum of all amounts.
    pub fn total_debt(&self) -> f64 {
        scoring::total_debt(&self.incidents)
    }

    /// Number of REPORTED incidents.
    pub fn critical_count(&self) -> usize {
        scoring::critical_count(&self.incidents)
    }

    /// Current reliability score.
    pub fn score(&self) -> u8 {
        scoring::compute_score(&self.incidents)
    }

    pub fn report(&self) -> ScoreReport {
        ScoreReport::from_incidents(&self.incidents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::entropy::RngEntropy;
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::types::IncidentStatus;

    /// Entropy that replays a fixed id sequence.
    struct ScriptedIds {
        ids: Vec<&'static str>,
    }

    impl EntropySource for ScriptedIds {
        fn incident_id(&mut self) -> String {
            self.ids.remove(0).to_string()
        }
        fn public_handle(&mut self, len: usize) -> String {
            "x".repeat(len)
        }
        fn external_ref(&mut self) -> String {
            "#0000-AA".to_string()
        }
        fn score_impact(&mut self) -> i32 {
            -9
        }
    }

    fn ledger() -> (IncidentLedger, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ledger = IncidentLedger::load(LedgerRepository::new(Arc::clone(&store))).unwrap();
        (ledger, store)
    }

    #[test]
    fn test_add_prepends_with_defaults() {
        let (mut ledger, _) = ledger();
        let mut entropy = RngEntropy::seeded(1);

        let first = ledger
            .add_incident(IncidentInput::titled("Shared costs").with_amount(45.0), &mut entropy)
            .unwrap()
            .unwrap();
        let second = ledger
            .add_incident(IncidentInput::titled("Rent"), &mut entropy)
            .unwrap()
            .unwrap();

        assert_eq!(first.status, IncidentStatus::Reported);
        assert_eq!(second.amount, 0.0);
        assert!((-14..=-5).contains(&first.score_impact));
        assert_eq!(ledger.incidents()[0].id, second.id);
        assert_eq!(ledger.incidents()[1].id, first.id);
    }

    #[test]
    fn test_blank_title_is_ignored() {
        let (mut ledger, store) = ledger();
        let mut entropy = RngEntropy::seeded(1);

        let result = ledger
            .add_incident(IncidentInput::titled("   ").with_amount(10.0), &mut entropy)
            .unwrap();

        assert!(result.is_none());
        assert_eq!(ledger.len(), 0);
        assert!(store.get("incidents").unwrap().is_none());
    }

    #[test]
    fn test_negative_amount_coerced() {
        let (mut ledger, _) = ledger();
        let mut entropy = RngEntropy::seeded(1);

        let incident = ledger
            .add_incident(IncidentInput::titled("Refund").with_amount(-30.0), &mut entropy)
            .unwrap()
            .unwrap();
        assert_eq!(incident.amount, 0.0);
    }

    #[test]
    fn test_colliding_id_is_regenerated() {
        let (mut ledger, _) = ledger();
        let mut entropy = ScriptedIds {
            ids: vec!["same", "same", "other"],
        };

        ledger.add_incident(IncidentInput::titled("a"), &mut entropy).unwrap();
        let second = ledger
            .add_incident(IncidentInput::titled("b"), &mut entropy)
            .unwrap()
            .unwrap();

        assert_eq!(second.id, "other");
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let (mut ledger, _) = ledger();
        let mut entropy = RngEntropy::seeded(9);

        ledger
            .add_incident(
                IncidentInput::titled("Family loan")
                    .with_amount(500.0)
                    .with_status(IncidentStatus::Pending),
                &mut entropy,
            )
            .unwrap();
        let before = ledger.incidents().to_vec();
        let score_before = ledger.score();

        let added = ledger
            .add_incident(IncidentInput::titled("Lydia").with_amount(45.0), &mut entropy)
            .unwrap()
            .unwrap();
        assert_ne!(ledger.score(), score_before);

        let removed = ledger.remove_incident(&added.id).unwrap();
        assert_eq!(removed.map(|i| i.id), Some(added.id));
        assert_eq!(ledger.incidents(), before.as_slice());
        assert_eq!(ledger.score(), score_before);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut ledger, _) = ledger();
        let mut entropy = RngEntropy::seeded(2);
        ledger.add_incident(IncidentInput::titled("a"), &mut entropy).unwrap();

        assert!(ledger.remove_incident("missing").unwrap().is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_mutations_persist() {
        let (mut ledger, store) = ledger();
        let mut entropy = RngEntropy::seeded(4);

        let incident = ledger
            .add_incident(
                IncidentInput::titled("Rent")
                    .with_amount(200.0)
                    .with_description("Landlord confirmation"),
                &mut entropy,
            )
            .unwrap()
            .unwrap();

        let reloaded = IncidentLedger::load(LedgerRepository::new(Arc::clone(&store))).unwrap();
        assert_eq!(reloaded.incidents(), &[incident.clone()]);

        ledger.remove_incident(&incident.id).unwrap();
        let reloaded = IncidentLedger::load(LedgerRepository::new(store)).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_derived_views() {
        let (mut ledger, _) = ledger();
        let mut entropy = RngEntropy::seeded(6);

        for (title, amount, status) in [
            ("Lydia", 45.0, IncidentStatus::Reported),
            ("Landlord", 0.0, IncidentStatus::Verified),
            ("Family", 500.0, IncidentStatus::Pending),
            ("Bakery", 12.0, IncidentStatus::Reported),
        ] {
            ledger
                .add_incident(
                    IncidentInput::titled(title)
                        .with_amount(amount)
                        .with_status(status),
                    &mut entropy,
                )
                .unwrap();
        }

        assert_eq!(ledger.total_debt(), 557.0);
        assert_eq!(ledger.critical_count(), 2);
        // 100 - 15 + 2 - 5 - 15 - 5
        assert_eq!(ledger.score(), 62);
        assert_eq!(ledger.report().score, 62);
    }
}
