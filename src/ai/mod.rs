//! AI service integration for portrait generation
//!
//! Builds the multi-part request, sends it to Gemini's image model and
//! extracts the generated image and commentary from the response.

pub mod extract;
pub mod gemini;
pub mod mime;
pub mod mock;
pub mod request;

pub use extract::extract;
pub use gemini::{GeminiPortraitClient, GenerateContentResponse};
pub use mock::MockGenerationClient;
pub use request::RequestBuilder;

use crate::models::PortraitRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &PortraitRequest) -> Result<GenerateContentResponse>;
}
