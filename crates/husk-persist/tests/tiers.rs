//! Cross-tier persistence scenarios

use husk_persist::{PersistenceStore, TierKind};
use husk_storage::{CookieJar, StorageArea};
use serde_json::{json, Value};
use std::time::Duration;

fn temp_store(name: &str) -> (std::path::PathBuf, PersistenceStore) {
    let path = std::env::temp_dir().join(format!("husk-tiers-{}.tsv", name));
    let _ = std::fs::remove_file(&path);
    (path.clone(), PersistenceStore::open(path))
}

#[test]
fn durable_records_survive_reopen() {
    let (path, mut store) = temp_store("reopen");
    store.store_for("winner", &json!({"score": 12}), Duration::from_secs(3600));
    drop(store);

    let mut reopened = PersistenceStore::open(path.clone());
    assert_eq!(
        reopened.get::<Value>("winner"),
        Some(json!({"score": 12}))
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn session_records_do_not_survive_reopen() {
    let (path, mut store) = temp_store("session");
    store.store_session("draft", &"in flight");
    assert_eq!(store.get::<String>("draft").as_deref(), Some("in flight"));
    drop(store);

    let mut reopened = PersistenceStore::open(path.clone());
    assert_eq!(reopened.get::<String>("draft"), None);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn remove_neutralizes_every_tier() {
    let session = StorageArea::session();
    let durable = StorageArea::session();
    let mut cookies = CookieJar::new();
    cookies.set_value("k", r#"{"data":"cookie copy","expiration":"session"}"#, None);

    let mut store = PersistenceStore::with_areas(session, durable, cookies);
    store.store_session("k", &"session copy");
    store.store_for("k", &"durable copy", Duration::from_secs(60));

    store.remove("k");

    assert_eq!(store.get::<String>("k"), None);
    assert!(!store.session_area().contains("k"));
    assert!(!store.durable_area().contains("k"));
    assert!(store.cookie_jar().is_empty());
}

#[test]
fn read_falls_through_to_cookie_tier() {
    let mut store = PersistenceStore::new();
    store
        .cookie_jar_mut()
        .set_value("only-here", r#"{"data":[true],"expiration":"session"}"#, None);

    assert_eq!(store.tier_of("only-here"), Some(TierKind::Cookie));
    assert_eq!(store.get::<Value>("only-here"), Some(json!([true])));
}

#[test]
fn expired_cookie_candidate_reads_as_absent() {
    let mut store = PersistenceStore::new();
    store
        .cookie_jar_mut()
        .set_value("stale", r#"{"data":1,"expiration":5}"#, None);

    assert_eq!(store.get::<Value>("stale"), None);
    assert!(store.cookie_jar().is_empty());
}

#[test]
fn recovery_after_backend_comes_back() {
    let mut store = PersistenceStore::new();
    store.durable_area_mut().set_disabled(true);
    store.store_for("k", &"cookie-tier value", Duration::from_secs(60));
    assert_eq!(store.tier_of("k"), Some(TierKind::Cookie));

    store.durable_area_mut().set_disabled(false);
    store.store_for("k", &"durable value", Duration::from_secs(60));

    // The durable tier now shadows the stale cookie copy
    assert_eq!(store.tier_of("k"), Some(TierKind::Durable));
    assert_eq!(store.get::<String>("k").as_deref(), Some("durable value"));
}

#[test]
fn overwrite_replaces_whole_record() {
    let mut store = PersistenceStore::new();
    store.store_for("cfg", &json!({"a": 1, "b": 2}), Duration::from_secs(60));
    store.store_for("cfg", &json!({"a": 9}), Duration::from_secs(60));

    assert_eq!(store.get::<Value>("cfg"), Some(json!({"a": 9})));
}
