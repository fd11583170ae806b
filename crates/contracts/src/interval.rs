//! Sample-index intervals (blinks, saccades).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive sample-index range `[onset, offset]`
///
/// `offset` is the last sample inside the interval, not one past the end.
/// Serialized as a two-element sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct SampleInterval {
    pub onset: usize,
    pub offset: usize,
}

/// Interval where the pupil measurement is invalid due to eyelid closure
pub type BlinkInterval = SampleInterval;

/// Saccade interval (passed through untouched)
pub type SaccadeInterval = SampleInterval;

impl SampleInterval {
    #[inline]
    pub const fn new(onset: usize, offset: usize) -> Self {
        Self { onset, offset }
    }

    /// Number of samples covered (both ends inclusive)
    #[inline]
    pub fn len(&self) -> usize {
        self.offset.saturating_sub(self.onset) + 1
    }

    /// Never true for a well-formed interval; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset < self.onset
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.onset <= index && index <= self.offset
    }

    /// Whether the two intervals share at least one sample
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.onset <= other.offset && other.onset <= self.offset
    }

    /// Duration in seconds at the given sampling rate
    pub fn duration_s(&self, sampling_rate: f64) -> f64 {
        self.len() as f64 / sampling_rate
    }
}

impl From<(usize, usize)> for SampleInterval {
    fn from((onset, offset): (usize, usize)) -> Self {
        Self { onset, offset }
    }
}

impl From<SampleInterval> for (usize, usize) {
    fn from(interval: SampleInterval) -> Self {
        (interval.onset, interval.offset)
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.onset, self.offset)
    }
}
