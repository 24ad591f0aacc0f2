//! Terminal front-end: analyze one warrant file.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use iwa_core::presentation::STATUS_ANALYZING;
use iwa_core::{acquire, FilePart, InputMode};
use std::path::PathBuf;
use std::time::Duration;

use super::ServiceArgs;
use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Warrant image or PDF (.jpg, .jpeg, .png, .pdf)
    pub file: PathBuf,

    #[command(flatten)]
    pub service: ServiceArgs,
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let analyzer = args.service.build_analyzer()?;

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let filename = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    let part = FilePart::new(filename, None, bytes);
    let Some(submission) = acquire(InputMode::Upload, Some(part), None)? else {
        output::print_empty(&args.file);
        return Ok(());
    };

    output::print_submission(&submission);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(STATUS_ANALYZING);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = analyzer.analyze_submission(&submission).await;

    spinner.finish_and_clear();
    output::print_result(&result);

    Ok(())
}
