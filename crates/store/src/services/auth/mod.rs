//! Authentication service.
//!
//! Vendor registration, password login, logout and profile edits. Passwords
//! are hashed with Argon2id before they reach the store and are never
//! returned; login semantics are otherwise the plain email + password check.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use marketplace_core::{Email, PasswordHash, VendorId};

use crate::db::{LocalStore, Medium, RepositoryError};
use crate::models::{Session, Vendor};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration form input.
#[derive(Debug)]
pub struct NewVendor {
    /// Contact name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Chosen password.
    pub password: SecretString,
    /// Password typed a second time.
    pub confirm_password: SecretString,
    /// Store display name.
    pub store_name: String,
    /// Store description (may be empty).
    pub description: String,
}

/// Profile edit input. Replaces every profile field.
#[derive(Debug)]
pub struct ProfileUpdate {
    /// Contact name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Store display name.
    pub store_name: String,
    /// Store description (may be empty).
    pub description: String,
    /// New password, if the vendor is changing it.
    pub new_password: Option<SecretString>,
}

/// Authentication service.
///
/// Borrows the store for the duration of the calls made through it.
pub struct AuthService<'a, M> {
    store: &'a mut LocalStore<M>,
}

impl<'a, M: Medium> AuthService<'a, M> {
    /// Create a new authentication service.
    pub fn new(store: &'a mut LocalStore<M>) -> Self {
        Self { store }
    }

    /// Register a new vendor and log them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField`, `AuthError::InvalidEmail`,
    /// `AuthError::PasswordMismatch` or `AuthError::WeakPassword` for bad
    /// input, and `AuthError::VendorAlreadyExists` if the email is taken.
    /// Nothing is written in any of these cases.
    ///
    /// Returns `AuthError::SessionNotSaved` carrying the vendor if the vendor
    /// was stored but the session write failed. The registration stands; the
    /// caller should log in rather than register again.
    pub fn register_vendor(&mut self, input: NewVendor) -> Result<Vendor, AuthError> {
        let name = required(&input.name, "name")?;
        let store_name = required(&input.store_name, "store name")?;
        let email = Email::parse(input.email.trim())?;

        if input.password.expose_secret() != input.confirm_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(input.password.expose_secret())?;

        if self.store.find_vendor_by_email(&email)?.is_some() {
            tracing::info!(%email, "registration rejected, email already registered");
            return Err(AuthError::VendorAlreadyExists);
        }

        let vendor = Vendor {
            id: VendorId::generate(),
            name,
            email,
            password_hash: hash_password(input.password.expose_secret())?,
            store_name,
            description: input.description.trim().to_owned(),
            created_at: Utc::now(),
        };

        self.store
            .insert_vendor_if_email_absent(vendor.clone())
            .map_err(conflict_as_exists)?;
        if let Err(source) = self.store.set_session(&Session::for_vendor(&vendor)) {
            tracing::warn!(vendor_id = %vendor.id, error = %source, "vendor registered, session not saved");
            return Err(AuthError::SessionNotSaved {
                vendor: Box::new(vendor),
                source,
            });
        }

        tracing::info!(vendor_id = %vendor.id, "vendor registered");
        Ok(vendor)
    }

    /// Log a vendor in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::VendorNotFound` if no vendor has this email and
    /// `AuthError::InvalidCredentials` if the password is wrong. The session
    /// is left untouched on failure.
    pub fn login_vendor(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<Vendor, AuthError> {
        let email = Email::parse(email.trim())?;

        let vendor = self
            .store
            .find_vendor_by_email(&email)?
            .ok_or(AuthError::VendorNotFound)?;

        verify_password(password.expose_secret(), &vendor.password_hash)?;

        self.store.set_session(&Session::for_vendor(&vendor))?;
        tracing::info!(vendor_id = %vendor.id, "vendor logged in");
        Ok(vendor)
    }

    /// Log out whoever is logged in. Logging out twice is fine.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the session slot cannot be cleared.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.clear_session()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// The logged-in vendor, if the session is a vendor session and the
    /// vendor record still exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store cannot be read.
    pub fn current_vendor(&self) -> Result<Option<Vendor>, AuthError> {
        let Some(vendor_id) = self
            .store
            .get_session()?
            .and_then(|session| session.vendor_id())
        else {
            return Ok(None);
        };
        Ok(self.store.find_vendor_by_id(&vendor_id)?)
    }

    /// Overwrite a vendor's profile.
    ///
    /// `id` and `created_at` are kept; the password hash is kept unless a new
    /// password is given. If the vendor is the one logged in, the session's
    /// name and email are refreshed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::VendorNotFound` for an unknown vendor,
    /// `AuthError::VendorAlreadyExists` if the new email belongs to another
    /// vendor, or a validation error for bad input.
    pub fn update_profile(
        &mut self,
        vendor_id: &VendorId,
        update: ProfileUpdate,
    ) -> Result<Vendor, AuthError> {
        let current = self
            .store
            .find_vendor_by_id(vendor_id)?
            .ok_or(AuthError::VendorNotFound)?;

        let name = required(&update.name, "name")?;
        let store_name = required(&update.store_name, "store name")?;
        let email = Email::parse(update.email.trim())?;

        let password_hash = match update.new_password {
            Some(password) => {
                validate_password(password.expose_secret())?;
                hash_password(password.expose_secret())?
            }
            None => current.password_hash,
        };

        let vendor = Vendor {
            id: current.id,
            name,
            email,
            password_hash,
            store_name,
            description: update.description.trim().to_owned(),
            created_at: current.created_at,
        };

        self.store
            .insert_vendor_if_email_absent(vendor.clone())
            .map_err(conflict_as_exists)?;

        if let Some(session) = self.store.get_session()?
            && session.id.is_vendor(&vendor.id)
        {
            self.store.set_session(&Session::for_vendor(&vendor))?;
        }

        tracing::info!(vendor_id = %vendor.id, "vendor profile updated");
        Ok(vendor)
    }
}

fn conflict_as_exists(err: RepositoryError) -> AuthError {
    match err {
        RepositoryError::Conflict(_) => AuthError::VendorAlreadyExists,
        other => AuthError::Repository(other),
    }
}

/// Trim a required text field, rejecting blank input.
fn required(value: &str, field: &'static str) -> Result<String, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id with a random salt.
fn hash_password(password: &str) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &PasswordHash) -> Result<(), AuthError> {
    let parsed_hash = PhcHash::new(hash.as_str()).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::ActorKind;

    use super::*;
    use crate::db::tests::FlakyMedium;
    use crate::db::{MemoryMedium, keys};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn registration(email: &str, password: &str) -> NewVendor {
        NewVendor {
            name: "Ada Lovelace".to_owned(),
            email: email.to_owned(),
            password: secret(password),
            confirm_password: secret(password),
            store_name: "Engines & Co".to_owned(),
            description: "Analytical engines".to_owned(),
        }
    }

    #[test]
    fn test_register_sets_session_and_hashes_password() {
        let mut store = LocalStore::new(MemoryMedium::new());
        let vendor = AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "secret1"))
            .unwrap();

        let found = store
            .find_vendor_by_email(&Email::parse("a@b.com").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found, vendor);
        assert!(found.password_hash.as_str().starts_with("$argon2id$"));

        let raw = store.medium().get(keys::VENDORS).unwrap().unwrap();
        assert!(!raw.contains("secret1"));

        let session = store.get_session().unwrap().unwrap();
        assert!(session.id.is_vendor(&vendor.id));
        assert_eq!(session.kind, ActorKind::Vendor);
    }

    #[test]
    fn test_duplicate_email_is_rejected_without_writing() {
        let mut store = LocalStore::new(MemoryMedium::new());
        AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "secret1"))
            .unwrap();
        let before = store.medium().get(keys::VENDORS).unwrap();

        let err = AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "another1"))
            .unwrap_err();
        assert!(matches!(err, AuthError::VendorAlreadyExists));
        assert_eq!(store.list_vendors().unwrap().len(), 1);
        assert_eq!(store.medium().get(keys::VENDORS).unwrap(), before);
    }

    #[test]
    fn test_register_reports_vendor_when_session_write_fails() {
        let mut store = LocalStore::new(FlakyMedium {
            fail_writes_to: Some(keys::SESSION),
            ..FlakyMedium::default()
        });

        let err = AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "secret1"))
            .unwrap_err();
        let AuthError::SessionNotSaved { vendor, source } = err else {
            panic!("expected SessionNotSaved");
        };
        assert!(matches!(source, RepositoryError::Unavailable(_)));
        assert_eq!(store.list_vendors().unwrap(), vec![*vendor.clone()]);
        assert_eq!(store.get_session().unwrap(), None);

        let retry = AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "secret1"))
            .unwrap_err();
        assert!(matches!(retry, AuthError::VendorAlreadyExists));

        let mut medium = store.into_medium();
        medium.fail_writes_to = None;
        let mut store = LocalStore::new(medium);
        let logged_in = AuthService::new(&mut store)
            .login_vendor("a@b.com", &secret("secret1"))
            .unwrap();
        assert_eq!(logged_in.id, vendor.id);
    }

    #[test]
    fn test_register_validation() {
        let mut store = LocalStore::new(MemoryMedium::new());
        let mut auth = AuthService::new(&mut store);

        let short = auth
            .register_vendor(registration("a@b.com", "abc"))
            .unwrap_err();
        assert!(matches!(short, AuthError::WeakPassword(_)));

        let mut mismatch = registration("a@b.com", "secret1");
        mismatch.confirm_password = secret("secret2");
        assert!(matches!(
            auth.register_vendor(mismatch).unwrap_err(),
            AuthError::PasswordMismatch
        ));

        let mut blank = registration("a@b.com", "secret1");
        blank.store_name = "   ".to_owned();
        assert!(matches!(
            auth.register_vendor(blank).unwrap_err(),
            AuthError::MissingField("store name")
        ));

        assert!(matches!(
            auth.register_vendor(registration("not-an-email", "secret1"))
                .unwrap_err(),
            AuthError::InvalidEmail(_)
        ));

        assert!(store.list_vendors().unwrap().is_empty());
        assert_eq!(store.get_session().unwrap(), None);
    }

    #[test]
    fn test_login_and_logout() {
        let mut store = LocalStore::new(MemoryMedium::new());
        let vendor = AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "secret1"))
            .unwrap();
        AuthService::new(&mut store).logout().unwrap();
        assert_eq!(store.get_session().unwrap(), None);

        let mut auth = AuthService::new(&mut store);
        assert!(matches!(
            auth.login_vendor("a@b.com", &secret("wrong-password")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_vendor("nobody@b.com", &secret("secret1")),
            Err(AuthError::VendorNotFound)
        ));
        assert!(auth.current_vendor().unwrap().is_none());

        let logged_in = auth.login_vendor("a@b.com", &secret("secret1")).unwrap();
        assert_eq!(logged_in.id, vendor.id);
        assert_eq!(auth.current_vendor().unwrap().unwrap().id, vendor.id);

        auth.logout().unwrap();
        auth.logout().unwrap();
        assert!(auth.current_vendor().unwrap().is_none());
    }

    #[test]
    fn test_update_profile() {
        let mut store = LocalStore::new(MemoryMedium::new());
        let first = AuthService::new(&mut store)
            .register_vendor(registration("a@b.com", "secret1"))
            .unwrap();
        AuthService::new(&mut store)
            .register_vendor(registration("c@d.com", "secret2"))
            .unwrap();
        AuthService::new(&mut store)
            .login_vendor("a@b.com", &secret("secret1"))
            .unwrap();

        let mut auth = AuthService::new(&mut store);
        let taken = auth
            .update_profile(
                &first.id,
                ProfileUpdate {
                    name: "Ada".to_owned(),
                    email: "c@d.com".to_owned(),
                    store_name: "Engines".to_owned(),
                    description: String::new(),
                    new_password: None,
                },
            )
            .unwrap_err();
        assert!(matches!(taken, AuthError::VendorAlreadyExists));

        let updated = auth
            .update_profile(
                &first.id,
                ProfileUpdate {
                    name: "Ada L.".to_owned(),
                    email: "ada@b.com".to_owned(),
                    store_name: "Engines".to_owned(),
                    description: "New".to_owned(),
                    new_password: Some(secret("better-secret")),
                },
            )
            .unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(updated.email.as_str(), "ada@b.com");

        let session = store.get_session().unwrap().unwrap();
        assert_eq!(session.email.as_str(), "ada@b.com");
        assert_eq!(session.name, "Ada L.");

        let vendors = store.list_vendors().unwrap();
        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[0].id, first.id);

        let mut auth = AuthService::new(&mut store);
        assert!(auth.login_vendor("ada@b.com", &secret("secret1")).is_err());
        assert!(auth.login_vendor("ada@b.com", &secret("better-secret")).is_ok());
    }
}
