//! SignalStore - uniformly sampled gaze/pupil time series
//!
//! Holds the time vector and the N×3 channel matrix. Shape is fixed at
//! construction; only the pupil column is mutated afterwards (blink correction).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ContractError;

/// Allowed relative deviation of a sample step from `1 / sampling_rate`
const UNIFORM_STEP_TOLERANCE: f64 = 1e-6;

/// Number of channels per sample
pub const CHANNELS: usize = 3;

/// One row of the channel matrix: gaze_x, gaze_y, pupil
pub type Sample = [f64; CHANNELS];

/// Channel column index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    GazeX = 0,
    GazeY = 1,
    Pupil = 2,
}

impl Channel {
    /// Column index in a [`Sample`]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Recording metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingInfo {
    /// Sampling frequency (Hz)
    pub sampling_rate: f64,

    /// Free-form attributes carried over from the source file
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl RecordingInfo {
    pub fn new(sampling_rate: f64) -> Self {
        Self {
            sampling_rate,
            attributes: BTreeMap::new(),
        }
    }
}

/// Rounding mode for [`SignalStore::time_as_index`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexRounding {
    /// Truncate toward zero
    #[default]
    Truncate,
    /// Round half away from zero
    Nearest,
}

/// Uniformly sampled eye-tracker signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalStore {
    info: RecordingInfo,
    times: Vec<f64>,
    channels: Vec<Sample>,
}

impl SignalStore {
    /// Build a store from an explicit time vector
    ///
    /// # Errors
    /// - non-positive or non-finite sampling rate
    /// - `times` and `channels` length mismatch
    /// - time steps not equal to `1 / sampling_rate`
    pub fn new(
        info: RecordingInfo,
        times: Vec<f64>,
        channels: Vec<Sample>,
    ) -> Result<Self, ContractError> {
        validate_sampling_rate(info.sampling_rate)?;

        if times.len() != channels.len() {
            return Err(ContractError::contract_violation(
                "times",
                format!(
                    "time vector has {} samples but channel matrix has {} rows",
                    times.len(),
                    channels.len()
                ),
            ));
        }

        let step = 1.0 / info.sampling_rate;
        if let Some((i, dt)) = times
            .windows(2)
            .map(|w| w[1] - w[0])
            .enumerate()
            .find(|(_, dt)| !(((dt / step) - 1.0).abs() <= UNIFORM_STEP_TOLERANCE))
        {
            return Err(ContractError::contract_violation(
                "times",
                format!(
                    "non-uniform sampling at index {}: step {dt} s, expected {step} s",
                    i + 1
                ),
            ));
        }

        Ok(Self {
            info,
            times,
            channels,
        })
    }

    /// Build a store whose time vector starts at 0
    pub fn from_channels(info: RecordingInfo, channels: Vec<Sample>) -> Result<Self, ContractError> {
        validate_sampling_rate(info.sampling_rate)?;
        let times = (0..channels.len())
            .map(|i| i as f64 / info.sampling_rate)
            .collect();
        Self::new(info, times, channels)
    }

    #[inline]
    pub fn info(&self) -> &RecordingInfo {
        &self.info
    }

    #[inline]
    pub fn sampling_rate(&self) -> f64 {
        self.info.sampling_rate
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[inline]
    pub fn channels(&self) -> &[Sample] {
        &self.channels
    }

    /// Copy one channel column out of the matrix
    pub fn channel(&self, channel: Channel) -> Vec<f64> {
        self.channels.iter().map(|s| s[channel.index()]).collect()
    }

    /// Copy of the pupil column
    pub fn pupil(&self) -> Vec<f64> {
        self.channel(Channel::Pupil)
    }

    #[inline]
    pub fn pupil_at(&self, index: usize) -> f64 {
        self.channels[index][Channel::Pupil.index()]
    }

    /// Overwrite one pupil sample
    #[inline]
    pub fn set_pupil(&mut self, index: usize, value: f64) {
        self.channels[index][Channel::Pupil.index()] = value;
    }

    /// Recording duration in seconds (0 for fewer than two samples)
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Convert times (seconds) into sample indices relative to `times[0]`
    ///
    /// Indices are not clamped to the recording; times before the origin map
    /// to negative indices.
    pub fn time_as_index(&self, times: &[f64], rounding: IndexRounding) -> Vec<i64> {
        let origin = self.times.first().copied().unwrap_or(0.0);
        times
            .iter()
            .map(|t| {
                let index = (t - origin) * self.info.sampling_rate;
                match rounding {
                    IndexRounding::Truncate => index.trunc() as i64,
                    IndexRounding::Nearest => index.round() as i64,
                }
            })
            .collect()
    }

    /// Convert a seconds-or-samples window into a sample count
    pub fn window_samples(&self, window: crate::WindowSpec) -> Result<usize, ContractError> {
        window.to_samples(self.info.sampling_rate)
    }
}

fn validate_sampling_rate(rate: f64) -> Result<(), ContractError> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(ContractError::contract_violation(
            "sampling_rate",
            format!("sampling_rate must be a positive number, got {rate}"),
        ));
    }
    Ok(())
}
