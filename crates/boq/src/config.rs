//! BOQ client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOQ_API_ENDPOINT` - Analysis workflow URL (default: the hosted service)
//! - `BOQ_TIMEOUT_SECS` - Request timeout in seconds (default: 120)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Hosted analysis workflow endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://nnnlnhxhyr4zd74guusgqb6wrm.srv.us/api/v1/boq/workflow";

/// Analysis runs are slow; the service routinely takes over a minute.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// BOQ client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoqConfig {
    /// Workflow URL the multipart form is posted to.
    pub endpoint: Url,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl BoqConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let endpoint = parse_endpoint(
            &get_optional_env("BOQ_API_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
        )?;

        let timeout = match get_optional_env("BOQ_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self { endpoint, timeout })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("BOQ_API_ENDPOINT".to_owned(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "BOQ_API_ENDPOINT".to_owned(),
            format!("unsupported scheme {other}"),
        )),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            "BOQ_TIMEOUT_SECS".to_owned(),
            "must be greater than zero".to_owned(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "BOQ_TIMEOUT_SECS".to_owned(),
            e.to_string(),
        )),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
