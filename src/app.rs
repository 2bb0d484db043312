//! Application orchestration for portrait generation.

use crate::ai::{extract, GeminiPortraitClient, GenerationClient, RequestBuilder};
use crate::encoder::{Base64FileEncoder, FileEncoder};
use crate::models::{BackgroundInput, Config, GenerationResult, ImageFile};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Runs the build → generate → extract pipeline.
pub struct App {
    builder: RequestBuilder,
    client: Box<dyn GenerationClient>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub encoder: Arc<dyn FileEncoder>,
    pub client: Box<dyn GenerationClient>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            builder: RequestBuilder::new(services.encoder),
            client: services.client,
        }
    }

    /// Construct an app talking to Gemini with the given configuration.
    pub fn new(config: &Config) -> Self {
        info!("Portrait provider: Gemini (model: {})", config.model);

        Self::with_services(AppServices {
            encoder: Arc::new(Base64FileEncoder::new()),
            client: Box::new(GeminiPortraitClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.timeout,
            )),
        })
    }

    /// Generate one portrait from the person photos and background.
    ///
    /// Precondition and file read errors are returned as-is. Any failure of
    /// the outbound call is logged here and surfaced as [`Error::Generation`].
    /// A response without an image is not an error; check
    /// [`GenerationResult::has_image`].
    pub async fn generate_portrait(
        &self,
        person_files: &[ImageFile],
        background: &BackgroundInput,
    ) -> Result<GenerationResult> {
        let request = self.builder.build(person_files, background).await?;

        info!(
            "Requesting portrait for {} person image(s) ({} background)",
            person_files.len(),
            match background {
                BackgroundInput::Text(_) => "text",
                BackgroundInput::Image(_) => "image",
            }
        );

        let response = self.client.generate(&request).await.map_err(|e| {
            error!("Portrait generation call failed: {}", e);
            Error::Generation
        })?;

        let result = extract(&response);

        if result.has_image() {
            info!("Portrait generated");
        } else {
            warn!(
                "Response did not contain an image part ({} candidate(s))",
                response.candidates.len()
            );
        }

        Ok(result)
    }
}
