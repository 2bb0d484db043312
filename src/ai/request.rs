//! Assembles the ordered multi-part portrait request.
//!
//! Person images always come first, in input order, so the model can be told
//! how many subjects precede the instruction. The background (text, or an
//! image followed by a placement instruction) always comes last.

use crate::encoder::FileEncoder;
use crate::models::{BackgroundInput, ContentPart, ImageFile, Modality, PortraitRequest};
use crate::{prompts, Error, Result};
use futures::future::try_join_all;
use std::sync::Arc;

pub const NO_PERSON_PHOTOS_MESSAGE: &str = "No person photos provided for generation.";
pub const NO_BACKGROUND_MESSAGE: &str = "No background provided for generation.";

pub struct RequestBuilder {
    encoder: Arc<dyn FileEncoder>,
}

impl RequestBuilder {
    pub fn new(encoder: Arc<dyn FileEncoder>) -> Self {
        Self { encoder }
    }

    async fn encode_part(&self, file: &ImageFile) -> Result<ContentPart> {
        let data = self.encoder.encode(file).await?;
        Ok(ContentPart::InlineData {
            mime_type: file.mime_type.clone(),
            data,
        })
    }

    pub async fn build(
        &self,
        person_files: &[ImageFile],
        background: &BackgroundInput,
    ) -> Result<PortraitRequest> {
        if person_files.is_empty() {
            return Err(Error::Precondition(NO_PERSON_PHOTOS_MESSAGE.to_string()));
        }
        if matches!(background, BackgroundInput::Text(text) if text.trim().is_empty()) {
            return Err(Error::Precondition(NO_BACKGROUND_MESSAGE.to_string()));
        }

        // All encodings run together; try_join_all keeps input order.
        let person_encodings = try_join_all(person_files.iter().map(|f| self.encode_part(f)));
        let background_encoding = async {
            match background {
                BackgroundInput::Image(file) => self.encode_part(file).await.map(Some),
                BackgroundInput::Text(_) => Ok(None),
            }
        };
        let (mut parts, background_part) =
            futures::try_join!(person_encodings, background_encoding)?;

        let instruction = prompts::count_instruction(person_files.len());

        match (background, background_part) {
            (BackgroundInput::Text(description), _) => {
                parts.push(ContentPart::Text(instruction));
                parts.push(ContentPart::Text(prompts::render(
                    prompts::TEXT_BACKGROUND,
                    &[("background", description.as_str())],
                )));
            }
            (BackgroundInput::Image(_), Some(image_part)) => {
                parts.push(image_part);
                parts.push(ContentPart::Text(prompts::render(
                    prompts::IMAGE_BACKGROUND,
                    &[("instruction", &instruction)],
                )));
            }
            (BackgroundInput::Image(_), None) => {
                return Err(Error::Invariant(
                    "Background image was not encoded".to_string(),
                ));
            }
        }

        tracing::debug!(
            "Built portrait request: {} person image(s), {} part(s) total",
            person_files.len(),
            parts.len()
        );

        Ok(PortraitRequest {
            parts,
            system_instruction: prompts::SYSTEM_INSTRUCTION.to_string(),
            response_modalities: vec![Modality::Image, Modality::Text],
        })
    }
}
