//! Configuration validation
//!
//! Rules:
//! - detect.min_dist finite and >= 0
//! - detect.window non-zero (a zero smoothing window never extends a blink)
//! - correct.window finite and >= 0, non-zero unless correction is NaN masking
//!
//! Spline orders are range-checked while parsing.

use contracts::{ContractError, PipelineConfig, WindowSpec};

/// Validate a pipeline configuration
///
/// Returns the first error encountered.
pub fn validate(config: &PipelineConfig) -> Result<(), ContractError> {
    validate_detect(config)?;
    validate_correct(config)?;
    Ok(())
}

fn validate_detect(config: &PipelineConfig) -> Result<(), ContractError> {
    let detect = &config.detect;
    if !(detect.min_dist.is_finite() && detect.min_dist >= 0.0) {
        return Err(ContractError::config_validation(
            "detect.min_dist",
            format!("min_dist must be >= 0, got {}", detect.min_dist),
        ));
    }

    validate_window("detect.window", detect.window)?;
    if is_zero(detect.window) {
        return Err(ContractError::config_validation(
            "detect.window",
            "smoothing window must be non-zero",
        ));
    }
    Ok(())
}

fn validate_correct(config: &PipelineConfig) -> Result<(), ContractError> {
    let correct = &config.correct;
    validate_window("correct.window", correct.window)?;
    if !correct.interp.is_nan_mask() && is_zero(correct.window) {
        return Err(ContractError::config_validation(
            "correct.window",
            format!(
                "'{}' correction needs anchors around each blink; window must be non-zero",
                correct.interp
            ),
        ));
    }
    Ok(())
}

fn validate_window(field: &str, window: WindowSpec) -> Result<(), ContractError> {
    if let WindowSpec::Seconds(secs) = window {
        if !(secs.is_finite() && secs >= 0.0) {
            return Err(ContractError::config_validation(
                field,
                format!("window must be a non-negative number of seconds, got {secs}"),
            ));
        }
    }
    Ok(())
}

fn is_zero(window: WindowSpec) -> bool {
    match window {
        WindowSpec::Samples(n) => n == 0,
        WindowSpec::Seconds(s) => s == 0.0,
    }
}
