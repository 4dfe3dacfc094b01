//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `esi_gateway` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use esi_gateway::initialization::init_logger_with;
use esi_gateway::{run_gateway, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_gateway(config).await {
        Ok(report) => {
            println!(
                "Handled {} request{} ({} document{} assembled, {} fragment{} resolved, {} failed) in {:.1}s",
                report.requests,
                if report.requests == 1 { "" } else { "s" },
                report.documents_assembled,
                if report.documents_assembled == 1 { "" } else { "s" },
                report.fragments_resolved,
                if report.fragments_resolved == 1 { "" } else { "s" },
                report.fragments_failed,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("esi_gateway error: {:#}", e);
            process::exit(1);
        }
    }
}
