//! Catalog error types.

use thiserror::Error;

use marketplace_core::ProductId;

use crate::db::RepositoryError;

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product input failed validation. Nothing was written.
    #[error("invalid product: {0}")]
    Validation(String),

    /// The operation needs a logged-in vendor.
    #[error("you must be logged in as a vendor")]
    Unauthorized,

    /// No product with this ID.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product belongs to another vendor.
    #[error("product {0} belongs to another vendor")]
    NotOwner(ProductId),

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<marketplace_core::PriceError> for CatalogError {
    fn from(err: marketplace_core::PriceError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<marketplace_core::ImageError> for CatalogError {
    fn from(err: marketplace_core::ImageError) -> Self {
        Self::Validation(err.to_string())
    }
}
