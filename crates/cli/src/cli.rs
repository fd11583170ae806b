//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::InterpKind;
use std::path::PathBuf;

/// Pupil Cleaner - blink detection and correction for eye-tracker recordings
#[derive(Parser, Debug)]
#[command(
    name = "pupil-cleaner",
    author,
    version,
    about = "Blink detection and correction for eye-tracker recordings",
    long_about = "Detects blinks in the pupil channel of eye-tracker recordings, \n\
                  masks or interpolates them, and writes the cleaned recording \n\
                  to a compressed archive. Also locates experiment events in \n\
                  the recording's message stream."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PUPIL_CLEANER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "PUPIL_CLEANER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and correct blinks, then save the cleaned recording
    Clean(CleanArgs),

    /// Locate messages matching a pattern
    Events(EventsArgs),

    /// Display recording information
    Info(InfoArgs),

    /// Validate a pipeline configuration file
    Validate(ValidateArgs),
}

/// Arguments for the `clean` command
#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Recording to clean (.pca, or .edf with a registered reader)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination archive (.pca)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pipeline configuration file (TOML or JSON)
    #[arg(short, long, env = "PUPIL_CLEANER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override correction kind (nan, linear, nearest, zero, cubic, spline-N, ...)
    #[arg(long, env = "PUPIL_CLEANER_INTERP")]
    pub interp: Option<InterpKind>,

    /// Override the minimum gap between blinks (seconds)
    #[arg(long)]
    pub min_dist: Option<f64>,

    /// Override the detection smoothing window (seconds)
    #[arg(long)]
    pub detect_window: Option<f64>,

    /// Override the correction anchor window (seconds)
    #[arg(long)]
    pub correct_window: Option<f64>,

    /// Keep the recording's stored blinks instead of replacing them with
    /// the detected ones
    #[arg(long)]
    pub keep_blinks: bool,

    /// Replace the output file if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Print the cleaning report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `events` command
#[derive(Parser, Debug)]
pub struct EventsArgs {
    /// Recording to search
    #[arg(short, long)]
    pub input: PathBuf,

    /// Regular expression searched anywhere in each message
    #[arg(short, long)]
    pub pattern: String,

    /// Also print the matched message text
    #[arg(long)]
    pub messages: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Recording to describe
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "pipeline.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
