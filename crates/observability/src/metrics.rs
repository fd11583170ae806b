//! Pipeline metrics
//!
//! Counters and histograms emitted through the `metrics` facade, plus an
//! in-memory aggregator for end-of-run summaries.

use contracts::BlinkInterval;
use metrics::{counter, gauge, histogram};

/// Record the outcome of one detection pass
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_detection;
///
/// record_detection(candidates.len(), &blinks, signal.sampling_rate());
/// ```
pub fn record_detection(candidates: usize, blinks: &[BlinkInterval], sampling_rate: f64) {
    counter!("pupil_cleaner_detection_runs_total").increment(1);
    counter!("pupil_cleaner_blink_candidates_total").increment(candidates as u64);
    counter!("pupil_cleaner_blinks_detected_total").increment(blinks.len() as u64);
    gauge!("pupil_cleaner_blinks_last_run").set(blinks.len() as f64);

    for blink in blinks {
        histogram!("pupil_cleaner_blink_duration_ms")
            .record(blink.duration_s(sampling_rate) * 1000.0);
    }
}

/// Record the outcome of one correction pass
pub fn record_correction(interp: &str, intervals: usize, masked: usize, interpolated: usize) {
    counter!(
        "pupil_cleaner_blinks_corrected_total",
        "interp" => interp.to_string()
    )
    .increment(intervals as u64);
    counter!("pupil_cleaner_samples_masked_total").increment(masked as u64);
    counter!(
        "pupil_cleaner_samples_interpolated_total",
        "interp" => interp.to_string()
    )
    .increment(interpolated as u64);
}

/// Record a recording load
pub fn record_recording_loaded(format: &str, samples: usize) {
    counter!(
        "pupil_cleaner_recordings_loaded_total",
        "format" => format.to_string()
    )
    .increment(1);
    histogram!("pupil_cleaner_recording_samples").record(samples as f64);
}

/// Record an archive write
pub fn record_recording_saved(bytes: usize, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "pupil_cleaner_recordings_saved_total",
        "status" => status.to_string()
    )
    .increment(1);
    if success {
        histogram!("pupil_cleaner_archive_bytes").record(bytes as f64);
    }
}

/// Record an event lookup
pub fn record_events_located(matches: usize) {
    counter!("pupil_cleaner_event_searches_total").increment(1);
    counter!("pupil_cleaner_events_matched_total").increment(matches as u64);
}

/// Cleaning statistics aggregator
///
/// Accumulates per-recording blink and correction counts in memory for the
/// end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct CleaningStatsAggregator {
    pub recordings: u64,
    pub total_samples: u64,
    pub total_blinks: u64,
    /// Samples covered by blinks
    pub blink_samples: u64,
    /// Samples set to NaN
    pub samples_masked: u64,
    /// Samples overwritten with interpolated values
    pub samples_interpolated: u64,
    /// Blink durations (ms)
    pub duration_stats: RunningStats,
    pub blinks_per_recording: RunningStats,
}

impl CleaningStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the detected blinks of one recording
    pub fn update_blinks(&mut self, blinks: &[BlinkInterval], sampling_rate: f64, samples: usize) {
        self.recordings += 1;
        self.total_samples += samples as u64;
        self.total_blinks += blinks.len() as u64;
        self.blinks_per_recording.push(blinks.len() as f64);

        for blink in blinks {
            self.blink_samples += blink.len() as u64;
            self.duration_stats
                .push(blink.duration_s(sampling_rate) * 1000.0);
        }
    }

    /// Add the correction counts of one recording
    pub fn update_correction(&mut self, masked: usize, interpolated: usize) {
        self.samples_masked += masked as u64;
        self.samples_interpolated += interpolated as u64;
    }

    pub fn summary(&self) -> CleaningSummary {
        let blink_fraction = if self.total_samples > 0 {
            self.blink_samples as f64 / self.total_samples as f64 * 100.0
        } else {
            0.0
        };
        CleaningSummary {
            recordings: self.recordings,
            total_samples: self.total_samples,
            total_blinks: self.total_blinks,
            blink_fraction,
            samples_masked: self.samples_masked,
            samples_interpolated: self.samples_interpolated,
            blink_duration_ms: StatsSummary::from(&self.duration_stats),
            blinks_per_recording: StatsSummary::from(&self.blinks_per_recording),
        }
    }
}

/// Printable snapshot of a [`CleaningStatsAggregator`]
#[derive(Debug, Clone, Default)]
pub struct CleaningSummary {
    pub recordings: u64,
    pub total_samples: u64,
    pub total_blinks: u64,
    /// Percentage of samples inside blinks
    pub blink_fraction: f64,
    pub samples_masked: u64,
    pub samples_interpolated: u64,
    pub blink_duration_ms: StatsSummary,
    pub blinks_per_recording: StatsSummary,
}

impl std::fmt::Display for CleaningSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Cleaning Summary ===")?;
        writeln!(
            f,
            "Recordings: {} ({} samples)",
            self.recordings, self.total_samples
        )?;
        writeln!(
            f,
            "Blinks: {} ({:.2}% of samples)",
            self.total_blinks, self.blink_fraction
        )?;
        writeln!(
            f,
            "Samples masked / interpolated: {} / {}",
            self.samples_masked, self.samples_interpolated
        )?;
        writeln!(f, "Blink duration (ms): {}", self.blink_duration_ms)?;
        writeln!(f, "Blinks per recording: {}", self.blinks_per_recording)
    }
}

/// Min / max / mean / std of a [`RunningStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        let std_dev = if stats.count < 2 {
            0.0
        } else {
            (stats.m2 / (stats.count - 1) as f64).sqrt()
        };
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            std_dev,
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "{:.1} ± {:.1} [{:.1}, {:.1}] (n={})",
            self.mean, self.std_dev, self.min, self.max, self.count
        )
    }
}

/// Streaming mean and variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }
}
