//! Detect-then-correct over one recording.

use blink_engine::{BlinkCorrector, BlinkDetector, CorrectionReport};
use contracts::{BlinkInterval, ContractError, PipelineConfig, Recording};
use tracing::{info, instrument};

/// Result of cleaning one recording
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// Blinks found by detection (the ones that were corrected)
    pub blinks: Vec<BlinkInterval>,
    /// Whether the detected blinks replaced the recording's stored list
    pub stored: bool,
    pub report: CorrectionReport,
}

/// Cleaning pipeline built from a validated configuration
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    detector: BlinkDetector,
    corrector: BlinkCorrector,
}

impl CleaningPipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self, ContractError> {
        config_loader::ConfigLoader::validate(config)?;
        Ok(Self {
            detector: BlinkDetector::new(config.detect.clone())?,
            corrector: BlinkCorrector::new(config.correct.clone()),
        })
    }

    /// Detect blinks, optionally store them, then correct the pupil channel
    ///
    /// The detected blinks are corrected whether or not they were stored.
    #[instrument(name = "clean_recording", skip_all, fields(samples = recording.signal.len()))]
    pub fn run(&self, recording: &mut Recording) -> Result<CleaningOutcome, ContractError> {
        let (blinks, stored) = match self.detector.apply(recording)? {
            None => (recording.blinks.clone(), true),
            Some(blinks) => (blinks, false),
        };

        let report = self.corrector.correct(&mut recording.signal, &blinks)?;

        info!(
            blinks = blinks.len(),
            stored,
            masked = report.samples_masked,
            interpolated = report.samples_interpolated,
            "recording cleaned"
        );
        Ok(CleaningOutcome {
            blinks,
            stored,
            report,
        })
    }
}
