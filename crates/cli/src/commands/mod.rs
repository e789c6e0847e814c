//! Subcommand implementations.
//!
//! Every command opens the file-backed store from `StoreConfig::from_env()`,
//! runs one service call and prints the result.

pub mod boq;
pub mod market;
pub mod output;
pub mod product;
pub mod store;
pub mod vendor;

use std::path::PathBuf;

use thiserror::Error;

use marketplace_boq::BoqError;
use marketplace_core::ImageError;
use marketplace_store::config::{ConfigError, StoreConfig};
use marketplace_store::services::{AuthError, CatalogError};
use marketplace_store::{FileMedium, LocalStore, MediumError, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Store configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// BOQ client configuration is invalid.
    #[error("Configuration error: {0}")]
    BoqConfig(#[from] marketplace_boq::ConfigError),

    /// The data directory cannot be opened.
    #[error("Cannot open store: {0}")]
    Medium(#[from] MediumError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Boq(#[from] BoqError),

    /// No vendor is logged in.
    #[error("Not logged in. Run `mkt vendor login` first")]
    NotLoggedIn,

    /// Product lookup by ID failed.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// An image file could not be read.
    #[error("Cannot read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image file has an extension we cannot map to a media type.
    #[error("Unsupported image type: {0}")]
    ImageType(PathBuf),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Open the file-backed store configured by the environment.
pub fn open_store() -> Result<LocalStore<FileMedium>, CommandError> {
    let config = StoreConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "opening store");
    Ok(config.open_store()?)
}
