//! Integration tests for vendor registration and login.
//!
//! Each step opens a new store handle on the same data directory, the way
//! separate CLI invocations would.

#![allow(clippy::unwrap_used)]

use marketplace_core::{ActorKind, Email};
use marketplace_integration_tests::{TestContext, new_vendor};
use marketplace_store::db::keys;
use marketplace_store::services::{AuthError, AuthService, ProfileUpdate};
use secrecy::SecretString;

#[test]
fn test_register_persists_vendor_and_session() {
    let ctx = TestContext::new().unwrap();

    let vendor = {
        let mut store = ctx.open().unwrap();
        AuthService::new(&mut store)
            .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
            .unwrap()
    };

    let store = ctx.open().unwrap();
    let found = store
        .find_vendor_by_email(&Email::parse("a@b.com").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(found, vendor);

    let session = store.get_session().unwrap().unwrap();
    assert_eq!(session.kind, ActorKind::Vendor);
    assert_eq!(session.vendor_id(), Some(vendor.id));
}

#[test]
fn test_password_is_never_stored_in_clear() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "hunter22"))
        .unwrap();

    let raw = ctx.read_key(keys::VENDORS).unwrap();
    assert!(!raw.contains("hunter22"));
    assert!(raw.contains("$argon2"));
    assert!(raw.contains("\"storeName\""));
}

#[test]
fn test_duplicate_email_leaves_store_unchanged() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();
    let before = ctx.read_key(keys::VENDORS).unwrap();

    let mut store = ctx.open().unwrap();
    let err = AuthService::new(&mut store)
        .register_vendor(new_vendor("Eve", "a@b.com", "secret2"))
        .unwrap_err();
    assert!(matches!(err, AuthError::VendorAlreadyExists));

    assert_eq!(ctx.read_key(keys::VENDORS).unwrap(), before);
    assert_eq!(store.list_vendors().unwrap().len(), 1);
}

#[test]
fn test_login_logout_cycle() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    let vendor = AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();

    AuthService::new(&mut store).logout().unwrap();
    assert!(ctx.read_key(keys::SESSION).is_none());

    let mut store = ctx.open().unwrap();
    let wrong = AuthService::new(&mut store)
        .login_vendor("a@b.com", &SecretString::from("secret2"))
        .unwrap_err();
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert!(store.get_session().unwrap().is_none());

    let unknown = AuthService::new(&mut store)
        .login_vendor("nobody@b.com", &SecretString::from("secret1"))
        .unwrap_err();
    assert!(matches!(unknown, AuthError::VendorNotFound));

    let logged_in = AuthService::new(&mut store)
        .login_vendor("a@b.com", &SecretString::from("secret1"))
        .unwrap();
    assert_eq!(logged_in.id, vendor.id);

    let store = ctx.open().unwrap();
    assert_eq!(
        store.get_session().unwrap().unwrap().vendor_id(),
        Some(vendor.id)
    );
}

#[test]
fn test_profile_update_refreshes_session_and_keeps_login() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    let vendor = AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();

    let updated = AuthService::new(&mut store)
        .update_profile(
            &vendor.id,
            ProfileUpdate {
                name: "Ada L.".to_owned(),
                email: "ada@b.com".to_owned(),
                store_name: vendor.store_name.clone(),
                description: "Lamps".to_owned(),
                new_password: None,
            },
        )
        .unwrap();
    assert_eq!(updated.created_at, vendor.created_at);

    let mut store = ctx.open().unwrap();
    let session = store.get_session().unwrap().unwrap();
    assert_eq!(session.name, "Ada L.");
    assert_eq!(session.email.as_str(), "ada@b.com");

    AuthService::new(&mut store).logout().unwrap();
    AuthService::new(&mut store)
        .login_vendor("ada@b.com", &SecretString::from("secret1"))
        .unwrap();
}
