//! Process entry point for the TTL sync pre-processor.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use ttl_sync::{Config, RunReport, TtlSyncPipeline};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match run().await {
        Ok(report) => {
            info!(
                dataset_id = %report.dataset_id,
                files = report.downloaded.len(),
                "pre-processor finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "error running pre-processor");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunReport> {
    let config = Config::from_env().context("error creating pre-processor")?;
    let pipeline = TtlSyncPipeline::from_config(&config).context("error creating pre-processor")?;

    info!(
        integration_id = %config.integration_id,
        input_dir = %config.input_dir.display(),
        output_dir = %config.output_dir.display(),
        api_host = %config.api_host,
        api2_host = %config.api2_host,
        environment = %config.environment,
        metadata_export = config.metadata_export,
        "created TTL sync pre-processor"
    );

    Ok(pipeline.run().await?)
}
