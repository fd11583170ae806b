//! # Pupil Cleaner CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Blink detection and correction of recordings
//! - Event lookup in the message stream
//! - Recording inspection and configuration validation

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_clean, run_events, run_info, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        "Pupil Cleaner CLI starting"
    );

    let result = match &cli.command {
        Commands::Clean(args) => run_clean(args),
        Commands::Events(args) => run_events(args),
        Commands::Info(args) => run_info(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: default_log_level.to_string(),
        log_to_stderr: true,
    })
}
