//! Blink correction: NaN masking and interpolation over a widened window.

use contracts::{BlinkInterval, ContractError, CorrectConfig, InterpKind, SignalStore};
use tracing::{debug, instrument, trace};

use crate::interp::{InterpError, Interpolant};

/// Outcome of one correction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Blinks processed
    pub intervals: usize,
    /// Pupil samples inside blinks set to NaN
    pub samples_masked: usize,
    /// Pupil samples overwritten with interpolated values
    pub samples_interpolated: usize,
}

/// Interpolated values for one widened window, not yet written
struct WindowFit {
    start: usize,
    values: Vec<f64>,
}

/// Blink corrector
#[derive(Debug, Clone)]
pub struct BlinkCorrector {
    config: CorrectConfig,
}

impl BlinkCorrector {
    pub fn new(config: CorrectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectConfig {
        &self.config
    }

    /// Correct `blinks` in the pupil channel of `signal`, in order
    ///
    /// All intervals are bounds-checked before anything is written. Each
    /// interval is fitted before it is written, so a failing interval leaves
    /// its own samples untouched; intervals processed before it stay
    /// corrected.
    ///
    /// # Errors
    /// - interval outside the signal (contract violation, nothing written)
    /// - window conversion failure (contract violation, nothing written)
    /// - too few valid anchors around a blink (insufficient data)
    #[instrument(
        name = "blink_correct",
        skip(self, signal, blinks),
        fields(interp = %self.config.interp, blinks = blinks.len())
    )]
    pub fn correct(
        &self,
        signal: &mut SignalStore,
        blinks: &[BlinkInterval],
    ) -> Result<CorrectionReport, ContractError> {
        validate_intervals(blinks, signal.len())?;

        let interp = self.config.interp;
        let margin = if interp.is_nan_mask() {
            0
        } else {
            signal.window_samples(self.config.window)?
        };

        let mut report = CorrectionReport::default();
        for &blink in blinks {
            let fit = if interp.is_nan_mask() {
                None
            } else {
                Some(
                    fit_window(signal, blink, margin, interp)
                        .map_err(|e| ContractError::insufficient_data(blink.onset, blink.offset, e))?,
                )
            };

            for i in blink.onset..=blink.offset {
                signal.set_pupil(i, f64::NAN);
            }
            report.samples_masked += blink.len();

            if let Some(fit) = fit {
                for (k, value) in fit.values.iter().enumerate() {
                    signal.set_pupil(fit.start + k, *value);
                }
                report.samples_interpolated += fit.values.len();
                trace!(%blink, start = fit.start, width = fit.values.len(), "blink interpolated");
            }
            report.intervals += 1;
        }

        debug!(
            intervals = report.intervals,
            masked = report.samples_masked,
            interpolated = report.samples_interpolated,
            margin_samples = margin,
            "blink correction finished"
        );
        observability::record_correction(
            &interp.to_string(),
            report.intervals,
            report.samples_masked,
            report.samples_interpolated,
        );

        Ok(report)
    }
}

fn validate_intervals(blinks: &[BlinkInterval], n: usize) -> Result<(), ContractError> {
    for (i, blink) in blinks.iter().enumerate() {
        if blink.onset > blink.offset || blink.offset >= n {
            return Err(ContractError::contract_violation(
                format!("blinks[{i}]"),
                format!("interval {blink} outside signal of {n} samples"),
            ));
        }
    }
    Ok(())
}

/// Fit over `[onset - margin, offset + margin]` (clamped to the signal),
/// treating blink samples and NaNs as missing
fn fit_window(
    signal: &SignalStore,
    blink: BlinkInterval,
    margin: usize,
    interp: InterpKind,
) -> Result<WindowFit, InterpError> {
    let start = blink.onset.saturating_sub(margin);
    let end = blink
        .offset
        .saturating_add(margin)
        .min(signal.len() - 1);

    let (xs, ys): (Vec<f64>, Vec<f64>) = (start..=end)
        .filter(|i| !blink.contains(*i))
        .map(|i| ((i - start) as f64, signal.pupil_at(i)))
        .filter(|(_, y)| !y.is_nan())
        .unzip();

    let interpolant = Interpolant::fit(interp, &xs, &ys)?;
    let values = (0..=end - start)
        .map(|x| interpolant.eval(x as f64))
        .collect::<Result<Vec<f64>, InterpError>>()?;

    Ok(WindowFit { start, values })
}
