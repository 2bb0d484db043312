//! Data models and structures
//!
//! Defines the file handles, background choice, request parts and results
//! that flow through the portrait pipeline, plus environment configuration.

use crate::ai::mime;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Where the bytes of an [`ImageFile`] live.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A user-supplied image: display name, MIME type and the bytes behind it.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub source: FileSource,
}

impl ImageFile {
    /// Reference a file on disk. The MIME type comes from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Precondition(format!("Invalid file path: {}", path.display())))?
            .to_string();

        let mime_type = mime::mime_for_path(path).ok_or_else(|| {
            Error::Precondition(format!("Unsupported image type: {}", path.display()))
        })?;

        Ok(Self {
            name,
            mime_type: mime_type.to_string(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Wrap bytes already in memory, sniffing the MIME type from the header.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime::detect_image_mime(&bytes).to_string(),
            source: FileSource::Memory(bytes),
        }
    }
}

/// Background for the portrait. Exactly one variant is used per request.
#[derive(Debug, Clone)]
pub enum BackgroundInput {
    Text(String),
    Image(ImageFile),
}

/// Which background input the session submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundMode {
    #[default]
    Text,
    Image,
}

/// One unit of the outbound request. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Base64 payload with its MIME type.
    InlineData { mime_type: String, data: String },
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Image,
    Text,
}

/// Fully assembled request, ready for a [`crate::ai::GenerationClient`].
#[derive(Debug, Clone)]
pub struct PortraitRequest {
    pub parts: Vec<ContentPart>,
    pub system_instruction: String,
    pub response_modalities: Vec<Modality>,
}

impl PortraitRequest {
    pub fn inline_part_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::InlineData { .. }))
            .count()
    }
}

/// What the model returned. Either field, both, or neither may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    /// Base64 image payload.
    pub image: Option<String>,
    pub text: Option<String>,
}

impl GenerationResult {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image_bytes(&self) -> Result<Option<Vec<u8>>> {
        use base64::Engine as _;
        self.image
            .as_deref()
            .map(|data| base64::engine::general_purpose::STANDARD.decode(data))
            .transpose()
            .map_err(Error::from)
    }

    /// `data:` URL suitable for direct display.
    pub fn data_url(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|data| format!("data:image/png;base64,{}", data))
    }
}

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("API_KEY environment variable not set".to_string()))?;

        let model = lookup("PORTRAIT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout = lookup("PORTRAIT_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    Error::Config(format!("Invalid PORTRAIT_TIMEOUT_SECS '{}'", raw))
                })
            })
            .transpose()?;

        Ok(Self {
            api_key,
            model,
            timeout,
        })
    }
}
