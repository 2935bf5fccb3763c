//! End-to-end citizen record scenarios.

use std::sync::Arc;

use register::{
    AuthMethod, CitizenRecord, FileStore, IncidentInput, IncidentStatus, KeyValueStore,
    MemoryStore, RedactionMode, RegisterConfig, RngEntropy, SessionState,
};

fn open(store: Arc<dyn KeyValueStore>, seed: u64) -> CitizenRecord {
    CitizenRecord::open(store, &RegisterConfig::default(), Box::new(RngEntropy::seeded(seed)))
        .expect("record opens")
}

#[test]
fn test_anonymous_rent_scenario() {
    let mut record = open(Arc::new(MemoryStore::new()), 1);
    record.login(AuthMethod::Anonymous).unwrap();
    assert_eq!(record.report().score, 100);

    let rent = record
        .add_incident(
            IncidentInput::titled("Rent")
                .with_amount(200.0)
                .with_status(IncidentStatus::Pending),
        )
        .unwrap()
        .expect("titled incident is recorded");
    // 100 - 5 - floor(200 / 100)
    assert_eq!(record.report().score, 93);

    record.set_mode(RedactionMode::Owner);
    record.remove_incident(&rent.id).unwrap();
    assert_eq!(record.report().score, 100);
    assert!(record.ledger().is_empty());
}

#[test]
fn test_blank_title_leaves_ledger_unchanged() {
    let mut record = open(Arc::new(MemoryStore::new()), 2);
    record.login(AuthMethod::Google).unwrap();
    record.add_incident(IncidentInput::titled("Lydia")).unwrap();

    let outcome = record.add_incident(IncidentInput::titled("")).unwrap();
    assert!(outcome.is_none());
    assert_eq!(record.ledger().len(), 1);
}

#[test]
fn test_handle_stability_across_processes() {
    let dir = tempfile::tempdir().unwrap();

    let handle = {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut record = open(store, 3);
        record.login(AuthMethod::Google).unwrap();
        record.profile().unwrap().unwrap().public_handle
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let mut record = open(store, 4);
    assert_eq!(
        record.session(),
        SessionState::Authenticated {
            method: AuthMethod::Google
        }
    );
    assert_eq!(record.mode(), RedactionMode::Public);

    record.login(AuthMethod::Google).unwrap();
    assert_eq!(record.profile().unwrap().unwrap().public_handle, handle);
    assert_eq!(record.view().unwrap().identity.display_name, handle);
}

#[test]
fn test_anonymous_step_regenerates_handle() {
    let mut record = open(Arc::new(MemoryStore::new()), 5);

    record.login(AuthMethod::Google).unwrap();
    let first = record.profile().unwrap().unwrap().public_handle;

    record.login(AuthMethod::Anonymous).unwrap();
    assert!(record.profile().unwrap().is_none());

    record.login(AuthMethod::Google).unwrap();
    let second = record.profile().unwrap().unwrap().public_handle;

    assert!(!second.is_empty());
    assert_ne!(first, second);
}

#[test]
fn test_ledger_survives_anonymous_login() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let mut record = open(Arc::clone(&store), 6);
    record.login(AuthMethod::Facebook).unwrap();
    record
        .add_incident(IncidentInput::titled("Family loan").with_amount(500.0))
        .unwrap();
    record.login(AuthMethod::Anonymous).unwrap();

    let reopened = open(store, 7);
    assert_eq!(reopened.ledger().len(), 1);
    assert!(reopened.profile().unwrap().is_none());
    // 100 - 15 - 5
    assert_eq!(reopened.report().score, 80);
}
