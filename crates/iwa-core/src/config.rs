//! Analyzer configuration.
//!
//! The service credential is resolved once at startup. Without it no
//! [`Analyzer`] can be built, so no request path is reachable.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::analysis::gemini::{self, GeminiClient};
use crate::analysis::Analyzer;
use crate::error::{IwaError, IwaResult};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// A non-empty API key. The value never shows up in `Debug` output.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Validate a credential value. Missing or blank values are fatal.
    pub fn new(value: Option<String>) -> IwaResult<Self> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Ok(Self(v)),
            _ => Err(IwaError::MissingCredential),
        }
    }

    /// Read the credential from `GEMINI_API_KEY`.
    pub fn from_env() -> IwaResult<Self> {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Settings for the external analysis service.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub credential: Credential,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AnalyzerConfig {
    /// Configuration with the default model, endpoint and timeout.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_GEMINI_URL.to_string(),
            timeout: gemini::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check settings that would otherwise only fail on the first request.
    pub fn validate(&self) -> IwaResult<()> {
        if self.model.trim().is_empty() {
            return Err(IwaError::config("model must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(IwaError::config(format!(
                "API base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(IwaError::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Build the Gemini-backed analyzer.
    pub fn build_analyzer(&self) -> IwaResult<Analyzer> {
        self.validate()?;
        let client = GeminiClient::new(
            self.credential.clone(),
            &self.model,
            &self.base_url,
            self.timeout,
        )?;

        info!(
            model = %self.model,
            timeout_secs = self.timeout.as_secs(),
            "Analysis service configured"
        );

        Ok(Analyzer::new(Arc::new(client)))
    }
}
