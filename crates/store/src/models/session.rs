//! The session slot record.

use serde::{Deserialize, Serialize};

use marketplace_core::{ActorId, ActorKind, Email, VendorId};

use super::Vendor;

/// Pointer to the currently authenticated actor.
///
/// At most one session exists at a time; see
/// [`LocalStore::set_session`](crate::LocalStore::set_session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The actor's record ID.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Actor email.
    pub email: Email,
    /// Whether the actor is a vendor or a customer.
    #[serde(rename = "type")]
    pub kind: ActorKind,
}

impl Session {
    /// Session for a logged-in vendor.
    #[must_use]
    pub fn for_vendor(vendor: &Vendor) -> Self {
        Self {
            id: ActorId::from(&vendor.id),
            name: vendor.name.clone(),
            email: vendor.email.clone(),
            kind: ActorKind::Vendor,
        }
    }

    /// The vendor this session belongs to, if it is a vendor session.
    #[must_use]
    pub fn vendor_id(&self) -> Option<VendorId> {
        match self.kind {
            ActorKind::Vendor => Some(VendorId::new(self.id.as_str())),
            ActorKind::Customer => None,
        }
    }
}
