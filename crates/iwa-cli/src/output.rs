//! Terminal output formatting.

use colored::Colorize;
use iwa_core::presentation::{DOCUMENT_PLACEHOLDER, STATUS_COMPLETE};
use iwa_core::{AnalysisResult, Submission};
use std::path::Path;

/// Print what is about to be analyzed.
pub fn print_submission(submission: &Submission) {
    let name = submission.filename.as_deref().unwrap_or("(unnamed)");

    if submission.document_type.is_image() {
        println!(
            "{} {} {}",
            "→".dimmed(),
            name.cyan(),
            format!("({}, {})", submission.content_type(), human_size(submission.size())).dimmed()
        );
    } else {
        println!("{} {} {}", "→".dimmed(), DOCUMENT_PLACEHOLDER, name.cyan());
    }
}

/// Print the analysis text, or the error string in red.
pub fn print_result(result: &AnalysisResult) {
    if result.is_error() {
        println!("{} {}", "✗".red().bold(), result.text().red());
        return;
    }

    println!("{} {}", "✓".green().bold(), STATUS_COMPLETE.green());
    println!();
    println!("{}", result.text());
}

/// Print the notice for an empty input file.
pub fn print_empty(path: &Path) {
    println!("{} {} is empty, nothing to analyze.", "!".yellow(), path.display());
}

fn human_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}
