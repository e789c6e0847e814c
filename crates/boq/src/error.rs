//! BOQ client errors.

use thiserror::Error;

/// Errors that can occur when talking to the analysis service.
#[derive(Debug, Error)]
pub enum BoqError {
    /// The submission was rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reading an upload or writing a report failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
