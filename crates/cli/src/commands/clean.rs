//! `clean` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{PipelineConfig, WindowSpec};
use ingestion::{save_archive, RecordingLoader};
use tracing::info;

use crate::cli::CleanArgs;
use crate::error::CliError;
use crate::pipeline::{CleanStats, CleaningPipeline};

/// Execute the `clean` command
pub fn run_clean(args: &CleanArgs) -> Result<()> {
    let started = Instant::now();

    if !args.input.exists() {
        return Err(CliError::input_not_found(&args.input).into());
    }

    let config = resolve_config(args)?;
    info!(
        input = %args.input.display(),
        interp = %config.correct.interp,
        min_dist = config.detect.min_dist,
        "Cleaning recording"
    );

    let pipeline = CleaningPipeline::new(&config).context("Invalid pipeline configuration")?;

    let mut recording = RecordingLoader::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load recording {}", args.input.display()))?;

    let outcome = pipeline
        .run(&mut recording)
        .with_context(|| format!("Failed to clean {}", args.input.display()))?;

    let overwrite = args.overwrite || config.output.overwrite;
    let bytes_written = save_archive(&recording, &args.output, overwrite)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    let stats = CleanStats {
        input: args.input.clone(),
        output: args.output.clone(),
        samples: recording.signal.len(),
        sampling_rate: recording.signal.sampling_rate(),
        interp: config.correct.interp.to_string(),
        blinks: outcome.blinks,
        blinks_stored: outcome.stored,
        samples_masked: outcome.report.samples_masked,
        samples_interpolated: outcome.report.samples_interpolated,
        bytes_written,
        elapsed_ms: 0.0,
    }
    .with_elapsed(started.elapsed());

    if args.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        stats.print_summary();
    }

    Ok(())
}

/// Load the configuration file (or defaults) and apply CLI overrides
fn resolve_config(args: &CleanArgs) -> Result<PipelineConfig> {
    if let Some(path) = args.config.as_deref().filter(|p| !p.exists()) {
        return Err(CliError::config_not_found(path).into());
    }
    let mut config = ConfigLoader::load_or_default(args.config.as_deref())
        .context("Failed to load pipeline config")?;

    if let Some(interp) = args.interp {
        info!(%interp, "Overriding correction kind from CLI");
        config.correct.interp = interp;
    }
    if let Some(min_dist) = args.min_dist {
        config.detect.min_dist = min_dist;
    }
    if let Some(secs) = args.detect_window {
        config.detect.window = seconds("detect-window", secs)?;
    }
    if let Some(secs) = args.correct_window {
        config.correct.window = seconds("correct-window", secs)?;
    }
    if args.keep_blinks {
        config.detect.overwrite = false;
    }

    Ok(config)
}

fn seconds(flag: &'static str, secs: f64) -> Result<WindowSpec> {
    if !(secs.is_finite() && secs >= 0.0) {
        return Err(CliError::invalid_override(flag, format!("expected seconds >= 0, got {secs}")).into());
    }
    Ok(WindowSpec::Seconds(secs))
}
