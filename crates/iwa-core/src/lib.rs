//! IWA Core Library
//!
//! Input acquisition, the warrant analysis dispatcher and UI-independent
//! presentation logic for the ICE Warrant Analyzer.

pub mod analysis;
pub mod config;
pub mod error;
pub mod presentation;
pub mod submission;

pub use analysis::{AnalysisError, AnalysisResult, AnalysisService, Analyzer};
pub use config::{AnalyzerConfig, Credential};
pub use error::{IwaError, IwaResult};
pub use submission::{acquire, DocumentType, FilePart, InputMode, Source, Submission};
