//! Vendor collection operations.

use marketplace_core::{Email, VendorId};

use super::{LocalStore, Medium, RepositoryError, keys, replace_or_append};
use crate::models::Vendor;

impl<M: Medium> LocalStore<M> {
    /// All vendors, in stored order. Empty if none have registered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn list_vendors(&self) -> Result<Vec<Vendor>, RepositoryError> {
        self.load_collection(keys::VENDORS)
    }

    /// Find a vendor by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn find_vendor_by_id(&self, id: &VendorId) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self
            .list_vendors()?
            .into_iter()
            .find(|vendor| &vendor.id == id))
    }

    /// Find a vendor by email. Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn find_vendor_by_email(&self, email: &Email) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self
            .list_vendors()?
            .into_iter()
            .find(|vendor| &vendor.email == email))
    }

    /// Insert a vendor, or replace the vendor with the same ID in place.
    ///
    /// Email uniqueness is not checked here; registration goes through
    /// [`Self::insert_vendor_if_email_absent`] instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Corrupt` if the stored collection does not
    /// decode, or `RepositoryError::Unavailable` / `RepositoryError::Serialize`
    /// if it cannot be written. The stored collection is then unchanged.
    pub fn upsert_vendor(&mut self, vendor: Vendor) -> Result<(), RepositoryError> {
        let mut vendors = self.load_collection_for_write::<Vendor>(keys::VENDORS)?;
        let id = vendor.id.clone();
        let replaced = replace_or_append(&mut vendors, vendor, |v| v.id == id).is_some();
        self.save_collection(keys::VENDORS, &vendors)?;
        tracing::debug!(vendor_id = %id, replaced, "upserted vendor");
        Ok(())
    }

    /// Insert a vendor (or replace the one with the same ID in place) unless
    /// another vendor already uses its email.
    ///
    /// The check and the write happen in one read-modify-write of the vendor
    /// collection, so the email invariant holds at the store boundary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a vendor with a different ID has
    /// the same email, `RepositoryError::Corrupt` if the stored collection
    /// does not decode (uniqueness cannot be checked), or a storage error if
    /// the collection cannot be read or written.
    pub fn insert_vendor_if_email_absent(&mut self, vendor: Vendor) -> Result<(), RepositoryError> {
        let mut vendors = self.load_collection_for_write::<Vendor>(keys::VENDORS)?;
        if vendors
            .iter()
            .any(|v| v.email == vendor.email && v.id != vendor.id)
        {
            return Err(RepositoryError::Conflict(format!(
                "a vendor with email {} already exists",
                vendor.email
            )));
        }
        let id = vendor.id.clone();
        replace_or_append(&mut vendors, vendor, |v| v.id == id);
        self.save_collection(keys::VENDORS, &vendors)?;
        tracing::debug!(vendor_id = %id, "stored vendor with unique email");
        Ok(())
    }
}
