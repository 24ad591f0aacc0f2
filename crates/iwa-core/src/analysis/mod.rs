//! Warrant analysis dispatcher.
//!
//! Packages a document and the fixed warrant prompt into a request for an
//! external [`AnalysisService`] and hands back a tagged [`AnalysisResult`].
//! Failures never escape as errors: the UI always gets something to render.

pub mod gemini;
pub mod mock;
pub mod prompt;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::submission::Submission;

pub use gemini::GeminiClient;
pub use mock::MockService;
pub use prompt::WARRANT_PROMPT;

/// Prefix of every displayed failure.
pub const ERROR_PREFIX: &str = "Error during analysis:";

/// A single request to the external model.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub content: &'a [u8],
    pub mime_type: &'a str,
    pub prompt: &'a str,
}

/// Failures of the external analysis call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response blocked by the model: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// External text-and-vision generation service.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Service name for logs (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier used for requests.
    fn model(&self) -> &str;

    /// Send the document and prompt, returning the model's free text.
    async fn generate(&self, request: &AnalysisRequest<'_>) -> Result<String, AnalysisError>;
}

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Completed(String),
    Failed(AnalysisError),
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Displayable text: the model response verbatim, or the error string.
    pub fn text(&self) -> String {
        match self {
            Self::Completed(text) => text.clone(),
            Self::Failed(err) => format!("{} {}", ERROR_PREFIX, err),
        }
    }
}

impl From<Result<String, AnalysisError>> for AnalysisResult {
    fn from(result: Result<String, AnalysisError>) -> Self {
        match result {
            Ok(text) => Self::Completed(text),
            Err(err) => Self::Failed(err),
        }
    }
}

/// The analysis dispatcher. Holds the injected service handle; read-only after
/// construction, so it is shared across requests without locking.
#[derive(Clone)]
pub struct Analyzer {
    service: Arc<dyn AnalysisService>,
    prompt: String,
}

impl Analyzer {
    /// Create a dispatcher using the fixed warrant prompt.
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self::with_prompt(service, WARRANT_PROMPT)
    }

    pub fn with_prompt(service: Arc<dyn AnalysisService>, prompt: impl Into<String>) -> Self {
        Self {
            service,
            prompt: prompt.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }

    /// Analyze raw content tagged with its MIME type.
    pub async fn analyze(&self, content: &[u8], content_type: &str) -> AnalysisResult {
        let request = AnalysisRequest {
            content,
            mime_type: content_type,
            prompt: &self.prompt,
        };

        debug!(
            service = self.service.name(),
            model = self.service.model(),
            mime = content_type,
            size = content.len(),
            "Dispatching analysis"
        );

        let started = Instant::now();
        let result = AnalysisResult::from(self.service.generate(&request).await);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            AnalysisResult::Completed(text) => {
                info!(elapsed_ms, chars = text.len(), "Analysis complete");
            }
            AnalysisResult::Failed(err) => {
                warn!(elapsed_ms, error = %err, "Analysis failed");
            }
        }

        result
    }

    /// Analyze an acquired submission.
    pub async fn analyze_submission(&self, submission: &Submission) -> AnalysisResult {
        self.analyze(&submission.content, submission.content_type()).await
    }

    /// Analyze and format straight to display text.
    pub async fn analyze_text(&self, content: &[u8], content_type: &str) -> String {
        self.analyze(content, content_type).await.text()
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("service", &self.service.name())
            .field("model", &self.service.model())
            .finish_non_exhaustive()
    }
}
