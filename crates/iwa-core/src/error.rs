//! Centralized error types for IWA.

use thiserror::Error;

/// Main error type for IWA operations.
///
/// Failures of the external analysis call are not represented here; they are
/// carried by [`crate::analysis::AnalysisError`] inside an `AnalysisResult`.
#[derive(Error, Debug)]
pub enum IwaError {
    #[error("GEMINI_API_KEY is not set. Set it with: export GEMINI_API_KEY=your-key")]
    MissingCredential,

    #[error("Unsupported document type for '{0}'. Upload a JPEG, PNG or PDF file.")]
    UnsupportedDocument(String),

    #[error("Invalid state transition: cannot move from '{from}' to '{to}'")]
    InvalidStateTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for IWA operations.
pub type IwaResult<T> = Result<T, IwaError>;

impl IwaError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unsupported document error for the given file name.
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedDocument(name.into())
    }
}
