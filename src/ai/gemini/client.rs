//! HTTP transport for Gemini's `generateContent` endpoint.
//!
//! Failures are returned, not logged at error level; the pipeline owns the
//! single user-facing report.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiHttpClient {
    /// Accepts the model either bare (`gemini-2.5-flash-image-preview`) or
    /// as a `models/...` resource name. Without a `timeout` a call waits as
    /// long as the server takes.
    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Option<Duration>,
        client: Client,
    ) -> Self {
        let model = match model.strip_prefix("models/") {
            Some(bare) => bare.to_string(),
            None => model,
        };

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Posts one portrait body and decodes the raw response envelope.
    ///
    /// Non-2xx statuses and undecodable bodies become `Error::AiProvider`;
    /// connection failures and timeouts surface as `Error::Http`.
    pub async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let mut call = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body);
        if let Some(timeout) = self.timeout {
            call = call.timeout(timeout);
        }

        let response = call.send().await.inspect_err(|e| {
            tracing::debug!("generateContent transport failure: {}", e);
        })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::debug!("generateContent returned {}: {}", status, text);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, text
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!("Undecodable generateContent body: {}", text);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }
}
