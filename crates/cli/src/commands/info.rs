//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::Recording;
use ingestion::RecordingLoader;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Recording info for JSON output
#[derive(Debug, Serialize)]
struct RecordingSummary {
    path: String,
    sampling_rate: f64,
    samples: usize,
    start_time: f64,
    duration_s: f64,
    blinks: usize,
    saccades: usize,
    messages: usize,
    /// Percentage of pupil samples that are NaN
    pupil_nan_pct: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(input = %args.input.display(), "Loading recording info");

    if !args.input.exists() {
        return Err(CliError::input_not_found(&args.input).into());
    }

    let recording = RecordingLoader::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load recording {}", args.input.display()))?;
    let summary = summarize(&args.input.display().to_string(), &recording);

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize recording info")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn summarize(path: &str, recording: &Recording) -> RecordingSummary {
    let signal = &recording.signal;
    let nan = signal.pupil().iter().filter(|p| p.is_nan()).count();

    RecordingSummary {
        path: path.to_string(),
        sampling_rate: signal.sampling_rate(),
        samples: signal.len(),
        start_time: signal.times().first().copied().unwrap_or(0.0),
        duration_s: signal.duration(),
        blinks: recording.blinks.len(),
        saccades: recording.saccades.len(),
        messages: recording.messages.len(),
        pupil_nan_pct: if signal.is_empty() {
            0.0
        } else {
            nan as f64 / signal.len() as f64 * 100.0
        },
        attributes: signal.info().attributes.clone(),
    }
}

fn print_summary(summary: &RecordingSummary) {
    println!("{}", summary.path);
    println!("   ├─ Sampling rate: {} Hz", summary.sampling_rate);
    println!(
        "   ├─ Samples: {} ({:.3} s from t={:.3})",
        summary.samples, summary.duration_s, summary.start_time
    );
    println!("   ├─ Blinks: {}", summary.blinks);
    println!("   ├─ Saccades: {}", summary.saccades);
    println!("   ├─ Messages: {}", summary.messages);
    println!("   └─ Pupil NaN: {:.2}%", summary.pupil_nan_pct);

    if !summary.attributes.is_empty() {
        println!("\nAttributes:");
        for (key, value) in &summary.attributes {
            println!("   {} = {}", key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingestion::SyntheticRecording;

    #[test]
    fn test_summarize_counts() {
        let mut rec = SyntheticRecording::new(100.0, 2.0)
            .start_time(50.0)
            .blink(1.0, 0.1, 0.0)
            .message(0.5, "TRIALID 1")
            .build()
            .unwrap();
        for i in 0..10 {
            rec.signal.set_pupil(i, f64::NAN);
        }

        let summary = summarize("rec.pca", &rec);
        assert_eq!(summary.samples, 200);
        assert_eq!(summary.blinks, 1);
        assert_eq!(summary.messages, 1);
        assert!((summary.pupil_nan_pct - 5.0).abs() < 1e-9);
        assert!((summary.start_time - 50.0).abs() < 1e-9);
        assert_eq!(summary.attributes["source"], "synthetic");
    }
}
