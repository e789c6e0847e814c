//! Marketplace Core - Shared domain types.
//!
//! This crate provides the types shared by every marketplace component:
//! - `store` - Local document store for vendors, products and the session slot
//! - `boq` - Client for the upstream bill-of-quantities analysis service
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Every type validates on construction and on
//! deserialization, so a value that exists is a value that is valid.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices, categories,
//!   credentials, actor kinds and product images

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
