//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::ServiceArgs;

/// Upper bound for `--max-upload-mb`.
const MAX_UPLOAD_MB: u64 = 1024;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "IWA_PORT", default_value = "7860")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "IWA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Largest accepted upload, in MiB
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..=MAX_UPLOAD_MB))]
    pub max_upload_mb: u64,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (with --log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub service: ServiceArgs,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    // The credential is resolved before anything binds.
    let analyzer = args.service.build_analyzer()?;

    println!();
    println!(
        "  {} {}",
        "IWA".cyan().bold(),
        "ICE Warrant Analyzer".bold()
    );
    println!();
    println!(
        "  {}  http://{}:{}",
        "Web UI".green(),
        args.host,
        args.port
    );
    println!(
        "  {}   {}",
        "Model".green(),
        analyzer.model()
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let config = iwa_web::ServerConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: upload_limit_bytes(args.max_upload_mb),
    };

    iwa_web::run_server(analyzer, config).await?;

    Ok(())
}

fn upload_limit_bytes(mb: u64) -> usize {
    usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_limit_bytes() {
        assert_eq!(upload_limit_bytes(20), 20 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(u64::MAX), usize::MAX);
    }
}
