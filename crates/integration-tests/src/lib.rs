//! Integration tests for the marketplace store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-integration-tests
//! ```
//!
//! Every test gets its own temporary data directory, so tests run in
//! parallel and leave nothing behind.
//!
//! # Test Categories
//!
//! - `vendor_flow` - Registration, login, logout and profile edits
//! - `product_flow` - Product lifecycle, dashboard and marketplace search
//! - `store_recovery` - On-disk format, corruption and restarts

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use secrecy::SecretString;
use tempfile::TempDir;

use marketplace_core::Category;
use marketplace_store::services::{NewVendor, ProductDraft};
use marketplace_store::{FileMedium, LocalStore, MediumError};

/// A file-backed store in a private temporary directory.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open a fresh store handle on the data directory, as a new process
    /// would.
    ///
    /// # Errors
    ///
    /// Returns `MediumError` if the directory cannot be opened.
    pub fn open(&self) -> Result<LocalStore<FileMedium>, MediumError> {
        Ok(LocalStore::new(FileMedium::open(self.data_dir())?))
    }

    /// Path of the file holding one store key.
    #[must_use]
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{key}.json"))
    }

    /// Raw contents of one store key, if present.
    #[must_use]
    pub fn read_key(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    /// Overwrite one store key with raw text.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub fn write_key(&self, key: &str, contents: &str) -> std::io::Result<()> {
        fs::write(self.key_path(key), contents)
    }
}

/// Registration input with matching passwords.
#[must_use]
pub fn new_vendor(name: &str, email: &str, password: &str) -> NewVendor {
    NewVendor {
        name: name.to_owned(),
        email: email.to_owned(),
        password: SecretString::from(password),
        confirm_password: SecretString::from(password),
        store_name: format!("{name}'s Store"),
        description: String::new(),
    }
}

/// A valid product form.
#[must_use]
pub fn product_draft(name: &str, price: Decimal, stock: u32, category: Category) -> ProductDraft {
    ProductDraft {
        name: name.to_owned(),
        description: format!("{name}, lovingly made"),
        price,
        category,
        images: Vec::new(),
        stock,
    }
}
