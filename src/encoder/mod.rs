//! File encoding for transmission
//!
//! Reads a whole image file and turns it into a base64 string that can be
//! embedded inline in a generation request.

pub mod file;
pub mod mock;

pub use file::Base64FileEncoder;
pub use mock::MockFileEncoder;

use crate::models::ImageFile;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FileEncoder: Send + Sync {
    async fn encode(&self, file: &ImageFile) -> Result<String>;
}
