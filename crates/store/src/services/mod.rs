//! Services layered on the store.
//!
//! Services own the rules the raw store does not enforce: input
//! validation, password hashing, email conflicts and product ownership.
//! They borrow the store mutably for the duration of a call and take the
//! session as an explicit argument where an operation needs an actor.
//!
//! - [`auth`] - Vendor registration, login, logout and profile edits
//! - [`catalog`] - Vendor product management and marketplace search

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, AuthService, NewVendor, ProfileUpdate};
pub use catalog::{CatalogError, CatalogService, ProductDraft, VendorDashboard};
