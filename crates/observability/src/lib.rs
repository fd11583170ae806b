//! # Observability
//!
//! Tracing initialisation plus `metrics` counters for the cleaning pipeline.
//!
//! ## Features
//!
//! - Tracing setup (JSON / Pretty / Compact formats, `RUST_LOG` aware)
//! - Detection / correction / load counters through the `metrics` facade
//! - In-memory cleaning statistics for end-of-run summaries
//!
//! No metrics recorder is installed here; counters are no-ops unless the
//! embedding application installs one.
//!
//! ## Usage
//!
//! ```ignore
//! use observability::{init_with_config, CleaningStatsAggregator, ObservabilityConfig};
//!
//! observability::init_with_config(ObservabilityConfig::default())?;
//!
//! let mut stats = CleaningStatsAggregator::new();
//! stats.update_blinks(&recording.blinks, recording.signal.sampling_rate(), recording.signal.len());
//! println!("{}", stats.summary());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-exports
pub use crate::metrics::{
    record_correction, record_detection, record_events_located, record_recording_loaded,
    record_recording_saved, CleaningStatsAggregator, CleaningSummary, RunningStats, StatsSummary,
};

/// Initialise tracing with defaults (compact output, `info` level)
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Write logs to stderr so stdout stays clean for JSON reports
    pub log_to_stderr: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            default_log_level: "info".to_string(),
            log_to_stderr: true,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Human readable, multi-line
    Pretty,
    /// Single-line compact
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "unknown log format '{other}', expected json, pretty or compact"
            )),
        }
    }
}

/// Initialise with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    macro_rules! install {
        ($layer:expr) => {{
            if config.log_to_stderr {
                tracing_subscriber::registry()
                    .with(filter)
                    .with($layer.with_writer(std::io::stderr))
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with($layer)
                    .try_init()
            }
        }};
    }

    match config.log_format {
        LogFormat::Json => install!(fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)),
        LogFormat::Pretty => install!(fmt::layer().pretty()),
        LogFormat::Compact => install!(fmt::layer().compact().with_target(false)),
    }
    .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}
