use super::gemini::types::GenerateContentResponse;
use super::GenerationClient;
use crate::models::PortraitRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted generation client for tests and local harnesses.
///
/// Responses are served round-robin; with none configured an empty response
/// is returned. Every request is recorded.
#[derive(Clone)]
pub struct MockGenerationClient {
    responses: Arc<Mutex<Vec<GenerateContentResponse>>>,
    requests: Arc<Mutex<Vec<PortraitRequest>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_response(self, response: GenerateContentResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Queue a response built from raw Gemini JSON.
    pub fn with_json_response(self, value: serde_json::Value) -> Self {
        let response = serde_json::from_value(value).expect("valid mock response JSON");
        self.with_response(response)
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<PortraitRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, request: &PortraitRequest) -> Result<GenerateContentResponse> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        let count = requests.len();

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock network failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(GenerateContentResponse::default())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
