use super::FileEncoder;
use crate::models::{FileSource, ImageFile};
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;

/// Encodes the full contents of a file as standard base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64FileEncoder;

impl Base64FileEncoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileEncoder for Base64FileEncoder {
    async fn encode(&self, file: &ImageFile) -> Result<String> {
        let encoded = match &file.source {
            FileSource::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    tracing::error!("Failed to read {}: {}", path.display(), e);
                    e
                })?;
                base64::engine::general_purpose::STANDARD.encode(bytes)
            }
            FileSource::Memory(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        };

        tracing::debug!(
            "Encoded {} ({}) into {} base64 chars",
            file.name,
            file.mime_type,
            encoded.len()
        );

        Ok(encoded)
    }
}
