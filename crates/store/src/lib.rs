//! Marketplace store library.
//!
//! An embedded document store for the three marketplace record kinds
//! (vendors, products and the single active session), plus the services
//! that sit on top of it.
//!
//! # Layers
//!
//! - [`db`] - Backing media and the [`LocalStore`] collection operations
//! - [`models`] - Persisted record types
//! - [`services`] - Vendor authentication and product catalog management
//! - [`config`] - Environment-driven configuration
//!
//! # Concurrency
//!
//! The store assumes a single actor. Reads take `&self` and writes take
//! `&mut self`, so in-process callers cannot interleave mutations. Separate
//! processes sharing one data directory are not supported.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use db::{FileMedium, LocalStore, Medium, MediumError, MemoryMedium, RepositoryError};
pub use models::{Product, Session, Vendor};
