//! Integration tests for the on-disk format and corruption handling.

#![allow(clippy::unwrap_used)]

use marketplace_integration_tests::{TestContext, new_vendor};
use marketplace_store::db::{KeyHealth, keys};
use marketplace_store::services::{AuthError, AuthService};
use marketplace_store::RepositoryError;

#[test]
fn test_fresh_directory_is_empty_and_healthy() {
    let ctx = TestContext::new().unwrap();
    let store = ctx.open().unwrap();

    assert!(store.list_vendors().unwrap().is_empty());
    assert!(store.list_products().unwrap().is_empty());
    assert!(store.get_session().unwrap().is_none());

    let health = store.verify().unwrap();
    assert_eq!(health.vendors, KeyHealth::Missing);
    assert_eq!(health.session, KeyHealth::Missing);
}

#[test]
fn test_collections_are_json_arrays_on_disk() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();

    let vendors: serde_json::Value =
        serde_json::from_str(&ctx.read_key(keys::VENDORS).unwrap()).unwrap();
    assert_eq!(vendors.as_array().unwrap().len(), 1);
    assert_eq!(vendors[0]["email"], "a@b.com");

    let session: serde_json::Value =
        serde_json::from_str(&ctx.read_key(keys::SESSION).unwrap()).unwrap();
    assert_eq!(session["type"], "vendor");
    assert_eq!(session["id"], vendors[0]["id"]);
}

#[test]
fn test_corrupt_file_reads_empty_and_survives_writes() {
    let ctx = TestContext::new().unwrap();
    ctx.write_key(keys::VENDORS, "{not json").unwrap();

    let mut store = ctx.open().unwrap();
    assert!(store.list_vendors().unwrap().is_empty());
    assert!(matches!(
        store.health().unwrap().vendors,
        KeyHealth::Corrupt(_)
    ));
    assert!(matches!(
        store.verify().unwrap_err(),
        RepositoryError::Corrupt { key, .. } if key == keys::VENDORS
    ));

    let err = AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Repository(RepositoryError::Corrupt { .. })
    ));
    assert_eq!(ctx.read_key(keys::VENDORS).as_deref(), Some("{not json"));
    assert!(ctx.read_key(keys::SESSION).is_none());
}

#[test]
fn test_plaintext_password_vendors_survive_registration() {
    let ctx = TestContext::new().unwrap();
    let legacy = r#"[{"id":"1700000000000","name":"Old","email":"old@shop.com","password":"secret1","storeName":"Old Shop","description":"","createdAt":"2024-01-01T00:00:00.000Z"}]"#;
    ctx.write_key(keys::VENDORS, legacy).unwrap();

    let mut store = ctx.open().unwrap();
    assert!(
        AuthService::new(&mut store)
            .register_vendor(new_vendor("Ada", "old@shop.com", "secret1"))
            .is_err()
    );
    assert_eq!(ctx.read_key(keys::VENDORS).as_deref(), Some(legacy));
}

#[test]
fn test_set_aside_lets_registration_resume() {
    let ctx = TestContext::new().unwrap();
    ctx.write_key(keys::VENDORS, "{not json").unwrap();

    let mut store = ctx.open().unwrap();
    assert_eq!(store.set_aside_corrupt().unwrap(), vec![keys::VENDORS]);
    AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();

    let store = ctx.open().unwrap();
    assert_eq!(store.list_vendors().unwrap().len(), 1);
    assert!(store.verify().unwrap().is_healthy());

    let backups: Vec<String> = std::fs::read_dir(ctx.data_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("marketplace_vendors_corrupt_"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        std::fs::read_to_string(ctx.data_dir().join(&backups[0])).unwrap(),
        "{not json"
    );
}

#[test]
fn test_corrupt_session_reads_as_logged_out() {
    let ctx = TestContext::new().unwrap();
    ctx.write_key(keys::SESSION, "[]").unwrap();

    let store = ctx.open().unwrap();
    assert!(store.get_session().unwrap().is_none());
    assert!(!store.health().unwrap().is_healthy());
}
