//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use iwa_core::analysis::gemini::{DEFAULT_GEMINI_URL, DEFAULT_MODEL};
use iwa_core::{Analyzer, AnalyzerConfig, Credential};
use std::time::Duration;

pub mod analyze;
pub mod serve;

/// ICE Warrant Analyzer - administrative or criminal?
#[derive(Parser)]
#[command(name = "iwa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web UI
    Serve(serve::ServeArgs),

    /// Analyze a single warrant file from the terminal
    Analyze(analyze::AnalyzeArgs),
}

/// Settings for the external analysis service, shared by all commands.
#[derive(Args)]
pub struct ServiceArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model to use
    #[arg(long, env = "IWA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Gemini API
    #[arg(long, env = "IWA_API_BASE", default_value = DEFAULT_GEMINI_URL)]
    pub api_base: String,

    /// Timeout for each analysis request, in seconds
    #[arg(long, env = "IWA_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

impl ServiceArgs {
    /// Resolve the credential and build the analyzer. Fails when the API key is missing.
    pub fn build_analyzer(&self) -> Result<Analyzer> {
        let credential = Credential::new(self.api_key.clone())?;
        let analyzer = AnalyzerConfig::new(credential)
            .with_model(&self.model)
            .with_base_url(&self.api_base)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .build_analyzer()?;
        Ok(analyzer)
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Analyze(args) => analyze::execute(args).await,
        }
    }
}
