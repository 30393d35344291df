//! Clamtag - S3 malware scan tagging
//!
//! Runs as an AWS Lambda function, or replays a saved event locally.

use anyhow::Context;
use clamtag_core::config::{ClamtagConfig, LoggingConfig};
use clamtag_core::types::BatchResult;
use clamtag_lambda::{build_reconciler, handle_event, InvocationEvent};
use clap::{Parser, Subcommand};
use lambda_runtime::service_fn;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "clamtag")]
#[command(version = clamtag_core::VERSION)]
#[command(about = "Start malware scans of new S3 objects and tag them with the result", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Scan files API base URL
    #[arg(long, global = true, env = "SCAN_FILES_URL")]
    scan_url: Option<String>,

    /// SSM parameter holding the scan files API key
    #[arg(long, global = true, env = "SCAN_FILES_API_KEY_PARAM_NAME")]
    api_key_param: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "REGION")]
    region: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CLAMTAG_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Lambda runtime loop (default)
    Serve,

    /// Process a saved invocation event and print the batch result
    Replay {
        /// JSON file with a `Records` array
        file: PathBuf,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load config: file, then environment, then CLI args
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ClamtagConfig::from_file(path)?;
            config.apply_env();
            config
        }
        None => ClamtagConfig::from_env(),
    };

    if let Some(url) = cli.scan_url {
        config.scan.url = url;
    }
    if let Some(param) = cli.api_key_param {
        config.scan.api_key_param_name = param;
    }
    if let Some(region) = cli.region {
        config.aws.region = region;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging);

    match cli.command {
        Some(Commands::Version) => {
            println!("clamtag {}", clamtag_core::VERSION);
        }
        Some(Commands::Replay { file }) => {
            replay(config, file).await?;
        }
        Some(Commands::Serve) | None => {
            serve(config).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.is_json() {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    }
}

async fn serve(config: ClamtagConfig) -> anyhow::Result<()> {
    info!("Starting clamtag {}", clamtag_core::VERSION);

    let reconciler = build_reconciler(&config).await?;
    let reconciler = &reconciler;

    lambda_runtime::run(service_fn(move |event| handle_event(reconciler, event)))
        .await
        .map_err(|e| anyhow::anyhow!("Lambda runtime failed: {}", e))
}

async fn replay(config: ClamtagConfig, file: PathBuf) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read event file {}", file.display()))?;
    let event: InvocationEvent = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event file {}", file.display()))?;

    info!(records = event.records.len(), "Replaying event from {}", file.display());

    let reconciler = build_reconciler(&config).await?;
    let result = reconciler.reconcile(&event.records).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    ensure_success(&result)
}

fn ensure_success(result: &BatchResult) -> anyhow::Result<()> {
    anyhow::ensure!(
        result.is_success(),
        "Replayed batch failed with status {}: {}",
        result.status,
        result.body
    );
    Ok(())
}
