//! Local document store.
//!
//! # Backing medium layout
//!
//! Three fixed logical keys:
//!
//! - `marketplace_vendors` - JSON array of [`Vendor`](crate::models::Vendor)
//! - `marketplace_products` - JSON array of [`Product`](crate::models::Product)
//! - `marketplace_current_user` - JSON object [`Session`](crate::models::Session),
//!   absent when nobody is logged in
//!
//! An absent key reads as an empty collection (or no session), so a fresh
//! medium needs no initialization step.
//!
//! # Failure model
//!
//! - Medium read/write failures and serialization faults propagate as
//!   [`RepositoryError::Unavailable`] / [`RepositoryError::Serialize`]. The
//!   store never retries.
//! - Reads of a collection that fails to decode log a warning and return
//!   empty, so browsing keeps working. Writes to that collection fail with
//!   [`RepositoryError::Corrupt`] and leave the stored value untouched.
//!   [`LocalStore::verify`] reports corruption explicitly and
//!   [`LocalStore::set_aside_corrupt`] moves corrupt values to backup keys so
//!   writes can resume.
//! - Every write replaces one whole collection in a single medium `set`, so
//!   a failed upsert or delete leaves the previous collection intact.

mod medium;
mod products;
mod session;
mod vendors;

pub use medium::{FileMedium, Medium, MediumError, MemoryMedium};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys for the three record kinds.
pub mod keys {
    /// Key for the vendor collection.
    pub const VENDORS: &str = "marketplace_vendors";

    /// Key for the product collection.
    pub const PRODUCTS: &str = "marketplace_products";

    /// Key for the single session slot.
    pub const SESSION: &str = "marketplace_current_user";
}

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing medium could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] MediumError),

    /// A record collection could not be serialized for writing.
    #[error("storage unavailable: failed to serialize {key}: {source}")]
    Serialize {
        /// Logical key being written.
        key: &'static str,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Stored data could not be decoded.
    #[error("storage corrupt at {key}: {reason}")]
    Corrupt {
        /// Logical key holding the corrupt value.
        key: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// A uniqueness constraint would be violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Health of one stored key, as reported by [`LocalStore::health`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyHealth {
    /// Key is absent (uninitialized).
    Missing,
    /// Key decodes; holds `records` records (1 for a present session).
    Ok {
        /// Number of decoded records.
        records: usize,
    },
    /// Key is present but does not decode.
    Corrupt(String),
}

/// Per-key health of the whole store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHealth {
    /// Vendor collection.
    pub vendors: KeyHealth,
    /// Product collection.
    pub products: KeyHealth,
    /// Session slot.
    pub session: KeyHealth,
}

impl StoreHealth {
    /// Returns true if no key is corrupt.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        !matches!(self.vendors, KeyHealth::Corrupt(_))
            && !matches!(self.products, KeyHealth::Corrupt(_))
            && !matches!(self.session, KeyHealth::Corrupt(_))
    }
}

/// Embedded document store over a backing [`Medium`].
///
/// The store owns its medium. Read operations take `&self`; write
/// operations take `&mut self`. The store holds no cache: every operation
/// reads the current value from the medium, so two stores opened on the same
/// data directory one after another see each other's writes.
#[derive(Debug)]
pub struct LocalStore<M> {
    medium: M,
}

impl<M: Medium> LocalStore<M> {
    /// Create a store over a medium.
    #[must_use]
    pub const fn new(medium: M) -> Self {
        Self { medium }
    }

    /// Borrow the backing medium.
    #[must_use]
    pub const fn medium(&self) -> &M {
        &self.medium
    }

    /// Consume the store and return its medium.
    #[must_use]
    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Report the health of every key without modifying anything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn health(&self) -> Result<StoreHealth, RepositoryError> {
        Ok(StoreHealth {
            vendors: self.key_health::<Vec<crate::models::Vendor>>(keys::VENDORS, Vec::len)?,
            products: self.key_health::<Vec<crate::models::Product>>(keys::PRODUCTS, Vec::len)?,
            session: self.key_health::<crate::models::Session>(keys::SESSION, |_| 1)?,
        })
    }

    /// Like [`Self::health`], but fails on the first corrupt key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Corrupt` naming the first corrupt key, or
    /// `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn verify(&self) -> Result<StoreHealth, RepositoryError> {
        let health = self.health()?;
        for (key, state) in [
            (keys::VENDORS, &health.vendors),
            (keys::PRODUCTS, &health.products),
            (keys::SESSION, &health.session),
        ] {
            if let KeyHealth::Corrupt(reason) = state {
                return Err(RepositoryError::Corrupt {
                    key,
                    reason: reason.clone(),
                });
            }
        }
        Ok(health)
    }

    /// Move every corrupt value to a backup key and clear the original, so
    /// writes to that key can resume.
    ///
    /// The backup key is `<key>_corrupt_<unix millis>`. Returns the keys that
    /// were moved; healthy and absent keys are left alone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read or
    /// written. A key whose backup could not be written is not cleared.
    pub fn set_aside_corrupt(&mut self) -> Result<Vec<&'static str>, RepositoryError> {
        let health = self.health()?;
        let stamp = chrono::Utc::now().timestamp_millis();
        let mut moved = Vec::new();
        for (key, state) in [
            (keys::VENDORS, &health.vendors),
            (keys::PRODUCTS, &health.products),
            (keys::SESSION, &health.session),
        ] {
            if !matches!(state, KeyHealth::Corrupt(_)) {
                continue;
            }
            let Some(raw) = self.medium.get(key)? else {
                continue;
            };
            let backup = format!("{key}_corrupt_{stamp}");
            self.medium.set(&backup, &raw)?;
            self.medium.remove(key)?;
            tracing::warn!(key, %backup, "moved corrupt value aside");
            moved.push(key);
        }
        Ok(moved)
    }

    fn key_health<T: DeserializeOwned>(
        &self,
        key: &'static str,
        count: impl Fn(&T) -> usize,
    ) -> Result<KeyHealth, RepositoryError> {
        match self.decode::<T>(key) {
            Ok(None) => Ok(KeyHealth::Missing),
            Ok(Some(value)) => Ok(KeyHealth::Ok {
                records: count(&value),
            }),
            Err(RepositoryError::Corrupt { reason, .. }) => Ok(KeyHealth::Corrupt(reason)),
            Err(e) => Err(e),
        }
    }

    /// Read and decode one key. `Ok(None)` means the key is absent.
    fn decode<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, RepositoryError> {
        let Some(raw) = self.medium.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RepositoryError::Corrupt {
                key,
                reason: e.to_string(),
            })
    }

    /// Load a collection, treating an absent or corrupt value as empty.
    fn load_collection<T: DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<Vec<T>, RepositoryError> {
        match self.decode::<Vec<T>>(key) {
            Ok(items) => {
                let items = items.unwrap_or_default();
                tracing::debug!(key, records = items.len(), "loaded collection");
                Ok(items)
            }
            Err(RepositoryError::Corrupt { key, reason }) => {
                tracing::warn!(key, %reason, "stored collection is corrupt, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Load a collection for a read-modify-write. Unlike
    /// [`Self::load_collection`], a corrupt value is an error, so the write
    /// never replaces records it could not read.
    fn load_collection_for_write<T: DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<Vec<T>, RepositoryError> {
        match self.decode::<Vec<T>>(key) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(e @ RepositoryError::Corrupt { .. }) => {
                tracing::error!(key, error = %e, "refusing to write over corrupt collection");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Serialize and write a whole collection in one medium `set`.
    fn save_collection<T: Serialize>(
        &mut self,
        key: &'static str,
        items: &[T],
    ) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(items)
            .map_err(|source| RepositoryError::Serialize { key, source })?;
        self.medium.set(key, &raw)?;
        tracing::debug!(key, records = items.len(), "saved collection");
        Ok(())
    }
}

/// Replace the first item matching `same` in place, or append.
///
/// Returns the replaced item, if any.
fn replace_or_append<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) -> Option<T> {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(slot) => Some(std::mem::replace(slot, item)),
        None => {
            items.push(item);
            None
        }
    }
}
