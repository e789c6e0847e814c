//! Vendor records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::{Email, PasswordHash, VendorId};

/// A registered vendor.
///
/// Vendors are created at registration and replaced wholesale on profile
/// edit. They are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Unique vendor ID.
    pub id: VendorId,
    /// Contact name.
    pub name: String,
    /// Login email, unique across vendors (exact match).
    pub email: Email,
    /// Salted one-way hash of the vendor's password.
    pub password_hash: PasswordHash,
    /// Display name of the vendor's store.
    pub store_name: String,
    /// Free-form store description.
    pub description: String,
    /// When the vendor registered.
    pub created_at: DateTime<Utc>,
}
