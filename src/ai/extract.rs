//! Pulls the generated image and commentary out of a Gemini response.

use super::gemini::types::{GenerateContentResponse, Part};
use crate::models::GenerationResult;

/// Scan the first candidate's parts in order.
///
/// When a response carries several parts of the same kind, the last one
/// encountered wins. Empty text and empty inline payloads are skipped, and
/// a response without candidates or parts yields an empty result.
pub fn extract(response: &GenerateContentResponse) -> GenerationResult {
    let mut result = GenerationResult::default();

    let Some(content) = response.candidates.first().and_then(|c| c.content.as_ref()) else {
        return result;
    };

    for part in &content.parts {
        match part {
            Part::InlineData { inline_data } if !inline_data.data.is_empty() => {
                tracing::debug!(
                    "Response image part: {} ({} base64 chars)",
                    inline_data.mime_type,
                    inline_data.data.len()
                );
                result.image = Some(inline_data.data.clone());
            }
            Part::Text { text } if !text.is_empty() => {
                result.text = Some(text.clone());
            }
            _ => {}
        }
    }

    result
}
