//! Core types for the marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod credential;
pub mod email;
pub mod id;
pub mod image;
pub mod price;
pub mod status;

pub use category::{Category, CategoryError};
pub use credential::PasswordHash;
pub use email::{Email, EmailError};
pub use id::*;
pub use image::{ImageError, ProductImage, ProductImages};
pub use price::{Price, PriceError};
pub use status::ActorKind;
