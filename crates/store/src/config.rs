//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MARKETPLACE_DATA_DIR` - Directory holding the store files (default: `.marketplace`)

use std::path::PathBuf;

use thiserror::Error;

use crate::db::{FileMedium, LocalStore, MediumError};

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".marketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory the file medium writes into.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `MARKETPLACE_DATA_DIR` is set
    /// but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = match get_optional_env("MARKETPLACE_DATA_DIR") {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "MARKETPLACE_DATA_DIR".to_owned(),
                    "must not be empty".to_owned(),
                ));
            }
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(DEFAULT_DATA_DIR),
        };

        Ok(Self { data_dir })
    }

    /// Open a file-backed store in the configured directory.
    ///
    /// # Errors
    ///
    /// Returns `MediumError` if the directory cannot be created.
    pub fn open_store(&self) -> Result<LocalStore<FileMedium>, MediumError> {
        Ok(LocalStore::new(FileMedium::open(&self.data_dir)?))
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
