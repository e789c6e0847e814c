//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::Vendor;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] marketplace_core::EmailError),

    /// A required field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Another vendor already uses this email.
    #[error("a vendor with this email already exists")]
    VendorAlreadyExists,

    /// No vendor is registered under this email or ID.
    #[error("vendor not found")]
    VendorNotFound,

    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Registration was stored but the session could not be written. The
    /// vendor exists and can log in; registering again would be rejected.
    #[error("vendor registered but not logged in: {source}")]
    SessionNotSaved {
        /// The stored vendor.
        vendor: Box<Vendor>,
        /// Why the session write failed.
        #[source]
        source: RepositoryError,
    },

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}
