//! Synthetic Pipeline Example
//!
//! Generates a recording with blinks, cleans it and writes the result to an
//! archive. Runs without tracker hardware or input files.
//!
//! Run with: cargo run -p demos --bin synthetic_pipeline [-- pipeline.toml]

use std::path::PathBuf;

use blink_engine::{BlinkCorrector, BlinkDetector};
use config_loader::ConfigLoader;
use contracts::{IndexRounding, InterpKind};
use events::EventLocator;
use ingestion::{save_archive, RecordingLoader, SyntheticRecording};
use observability::CleaningStatsAggregator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Synthetic Pipeline Demo");

    // ==== Stage 1: Configuration ====
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = ConfigLoader::load_or_default(config_path.as_deref())?;
    if config_path.is_none() {
        config.correct.interp = InterpKind::Spline(3);
    }
    tracing::info!(interp = %config.correct.interp, "Pipeline configured");

    // ==== Stage 2: Generate and store a raw recording ====
    let synthetic = SyntheticRecording::new(500.0, 20.0)
        .seed(2024)
        .blink(2.0, 0.15, 0.04)
        .blink(2.25, 0.05, 0.0)
        .blink(7.5, 0.12, 0.03)
        .blink(13.0, 0.3, 0.05)
        .message(1.0, "TRIALID 1")
        .message(6.0, "TRIALID 2")
        .message(12.0, "TRIALID 3");
    let mut raw = synthetic.build()?;
    raw.blinks.clear();

    let dir = std::env::temp_dir().join("pupil-cleaner-demo");
    std::fs::create_dir_all(&dir)?;
    let raw_path = dir.join("raw.pca");
    save_archive(&raw, &raw_path, true)?;

    // ==== Stage 3: Load, detect, correct ====
    let mut recording = RecordingLoader::new().load(&raw_path)?;
    tracing::info!(%recording, "Recording loaded");

    let detector = BlinkDetector::new(config.detect.clone())?;
    let blinks = match detector.apply(&mut recording)? {
        None => recording.blinks.clone(),
        Some(blinks) => blinks,
    };
    for (planted, found) in synthetic.expected_blinks().iter().zip(&blinks) {
        tracing::info!(%planted, %found, "Blink");
    }

    let corrector = BlinkCorrector::new(config.correct.clone());
    let report = corrector.correct(&mut recording.signal, &blinks)?;

    let clean_path = dir.join("clean.pca");
    let bytes = save_archive(&recording, &clean_path, true)?;
    tracing::info!(path = %clean_path.display(), bytes, "Cleaned archive written");

    // ==== Stage 4: Events ====
    let trials = EventLocator::new("^TRIALID")?.find_in(&recording)?;
    let times: Vec<f64> = trials.iter().map(|m| m.time).collect();
    let indices = recording
        .signal
        .time_as_index(&times, IndexRounding::Nearest);
    for (m, idx) in trials.iter().zip(indices) {
        tracing::info!(time = m.time, sample = idx, message = %m.message, "Trial onset");
    }

    // ==== Stage 5: Summary ====
    let mut stats = CleaningStatsAggregator::new();
    stats.update_blinks(&blinks, recording.signal.sampling_rate(), recording.signal.len());
    stats.update_correction(report.samples_masked, report.samples_interpolated);
    println!("{}", stats.summary());

    Ok(())
}
