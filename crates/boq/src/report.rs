//! Helpers for presenting and saving analysis results.

use std::path::Path;

use chrono::Utc;

use crate::error::BoqError;

/// Bytes as megabytes with two decimals, e.g. `"1.50"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

/// `boq-analysis-<unix millis>.json`.
#[must_use]
pub fn default_report_name() -> String {
    format!("boq-analysis-{}.json", Utc::now().timestamp_millis())
}

/// Write an analysis result as pretty-printed JSON.
///
/// # Errors
///
/// Returns `BoqError::Io` if the file cannot be written.
pub async fn write_report(path: impl AsRef<Path>, report: &serde_json::Value) -> Result<(), BoqError> {
    let path = path.as_ref();
    let body = serde_json::to_string_pretty(report).map_err(|e| BoqError::Parse(e.to_string()))?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| BoqError::Io {
            path: path.display().to_string(),
            source,
        })?;
    tracing::info!(path = %path.display(), "saved analysis report");
    Ok(())
}
