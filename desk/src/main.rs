//! Auction desk command-line tool
//!
//! # Usage
//!
//! ```bash
//! auction-desk assign --event gala-2025 --guest guest-17 --number 150
//! auction-desk cancel --event gala-2025 --reason "Event full" reg-holder-3 guest-9
//! auction-desk import --event gala-2025 guests.json --dry-run
//! ```
//!
//! Exits non-zero when anything failed, including partial batch failures.

use auction_desk::{DeskApp, DeskConfig, cli::CliArgs};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,auction_desk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let mut config = DeskConfig::from_env();
    args.apply(&mut config);
    tracing::debug!(
        api_url = %config.api.base_url,
        max_concurrency = config.batch.max_concurrency,
        preflight = config.batch.preflight,
        "Configuration loaded"
    );

    let app = DeskApp::new(config)?;
    let report = app.run(&args.command).await?;

    for line in &report.lines {
        println!("{line}");
    }
    for notice in &report.notices {
        println!("{notice}");
    }

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
