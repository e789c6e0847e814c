//! HTTP client for the analysis workflow endpoint.

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

use crate::config::BoqConfig;
use crate::error::BoqError;
use crate::request::BoqRequest;

/// Analysis service client.
#[derive(Debug, Clone)]
pub struct BoqClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl BoqClient {
    /// Create a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BoqConfig) -> Result<Self, BoqError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(config.endpoint.clone(), client))
    }

    /// Use an already configured HTTP client.
    #[must_use]
    pub const fn with_client(endpoint: Url, client: reqwest::Client) -> Self {
        Self { client, endpoint }
    }

    /// The workflow URL requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit a request and return the service's JSON verbatim.
    ///
    /// # Errors
    ///
    /// Returns `BoqError::Api` for a non-2xx answer, `BoqError::Parse` if the
    /// body is not JSON, or `BoqError::Http` if the request itself fails.
    pub async fn analyze(&self, request: BoqRequest) -> Result<Value, BoqError> {
        let file_count = request.files().len();
        let total_size = request.total_size();
        let (user_input, user_id, session_id, files) = request.into_parts();

        tracing::info!(
            endpoint = %self.endpoint,
            %user_id,
            %session_id,
            file_count,
            total_size,
            "submitting BOQ analysis"
        );

        let mut form = Form::new()
            .text("user_input", user_input)
            .text("user_id", user_id)
            .text("session_id", session_id);
        for file in files {
            let mime = file.format().map_or("application/octet-stream", |f| f.mime());
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(mime)?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "BOQ analysis failed");
            return Err(BoqError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| BoqError::Parse(e.to_string()))
    }
}
