use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::ai::GenerationClient;
use crate::models::{ContentPart, PortraitRequest};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

impl From<&ContentPart> for Part {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::InlineData { mime_type, data } => Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
            },
            ContentPart::Text(text) => Part::Text { text: text.clone() },
        }
    }
}

impl From<&PortraitRequest> for GenerateContentRequest {
    fn from(request: &PortraitRequest) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: request.parts.iter().map(Part::from).collect(),
            }],
            generation_config: GenerationConfig {
                response_modalities: request.response_modalities.clone(),
            },
        }
    }
}

/// Sends portrait requests to Gemini's image-capable models.
pub struct GeminiPortraitClient {
    http: GeminiHttpClient,
}

impl GeminiPortraitClient {
    pub fn new(api_key: String, model: String, timeout: Option<Duration>) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Option<Duration>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }
}

#[async_trait]
impl GenerationClient for GeminiPortraitClient {
    async fn generate(&self, request: &PortraitRequest) -> Result<GenerateContentResponse> {
        tracing::debug!(
            "Sending portrait request to Gemini model {} ({} parts, {} inline)",
            self.model(),
            request.parts.len(),
            request.inline_part_count()
        );

        let response = self
            .http
            .generate_content(&GenerateContentRequest::from(request))
            .await?;

        tracing::debug!(
            "Gemini returned {} candidate(s)",
            response.candidates.len()
        );

        Ok(response)
    }
}
