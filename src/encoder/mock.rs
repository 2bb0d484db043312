use super::{Base64FileEncoder, FileEncoder};
use crate::models::ImageFile;
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Encoder that records every file it is asked to encode.
#[derive(Clone)]
pub struct MockFileEncoder {
    encoded: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockFileEncoder {
    pub fn new() -> Self {
        Self {
            encoded: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.encoded.lock().unwrap().len()
    }

    /// Names of the files encoded so far, in call order.
    pub fn get_encoded_names(&self) -> Vec<String> {
        self.encoded.lock().unwrap().clone()
    }
}

impl Default for MockFileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileEncoder for MockFileEncoder {
    async fn encode(&self, file: &ImageFile) -> Result<String> {
        self.encoded.lock().unwrap().push(file.name.clone());

        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Io(std::io::Error::other("Mock read failure")));
        }

        Base64FileEncoder.encode(file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_encoder_counts_calls() {
        let encoder = MockFileEncoder::new();
        let file = ImageFile::from_bytes("mum.png", vec![1u8, 2, 3]);

        assert_eq!(encoder.get_call_count(), 0);
        let encoded = encoder.encode(&file).await.unwrap();
        assert_eq!(encoded, "AQID");
        assert_eq!(encoder.get_call_count(), 1);
        assert_eq!(encoder.get_encoded_names(), vec!["mum.png".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_encoder_failure() {
        let encoder = MockFileEncoder::new().with_failure(true);
        let file = ImageFile::from_bytes("mum.png", vec![1u8, 2, 3]);

        assert!(encoder.encode(&file).await.is_err());
        assert_eq!(encoder.get_call_count(), 1);
    }
}
