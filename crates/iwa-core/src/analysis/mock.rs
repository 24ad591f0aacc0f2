//! In-process analysis service returning canned responses.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{AnalysisError, AnalysisRequest, AnalysisService};

/// A request as seen by [`MockService`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub prompt: String,
}

/// A fake service that records every request and answers with a fixed
/// response or error.
#[derive(Default)]
pub struct MockService {
    response: Option<Result<String, AnalysisError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(Ok(response.into()));
        self
    }

    pub fn with_error(mut self, error: AnalysisError) -> Self {
        self.response = Some(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl AnalysisService for MockService {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &AnalysisRequest<'_>) -> Result<String, AnalysisError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                content: request.content.to_vec(),
                mime_type: request.mime_type.to_string(),
                prompt: request.prompt.to_string(),
            });
        }

        self.response
            .clone()
            .unwrap_or_else(|| Ok("Mock response".to_string()))
    }
}
