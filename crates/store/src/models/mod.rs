//! Persisted record types.
//!
//! Field names are camelCase on the wire (`vendorId`, `storeName`,
//! `createdAt`). Product and session documents share the web front end's
//! layout. Vendors differ: they carry an Argon2 `passwordHash` where the
//! front end stored a cleartext `password`, so front-end vendor documents do
//! not decode and the vendor collection holding them is treated as corrupt.

pub mod product;
pub mod session;
pub mod vendor;

pub use product::{Product, ProductQuery};
pub use session::Session;
pub use vendor::Vendor;
