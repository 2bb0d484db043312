//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

/// Message shown to the user for any transport or API failure.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate portrait. Please check your prompt and images and try again.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller error detected before any encoding or network work.
    #[error("{0}")]
    Precondition(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    /// User-facing wrapper for every failure of the outbound generation call.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Generation,

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
