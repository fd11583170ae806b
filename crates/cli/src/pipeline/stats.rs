//! Cleaning run statistics.

use std::path::PathBuf;
use std::time::Duration;

use contracts::BlinkInterval;
use observability::CleaningStatsAggregator;
use serde::Serialize;

/// Report of one `clean` run
#[derive(Debug, Clone, Serialize)]
pub struct CleanStats {
    pub input: PathBuf,
    pub output: PathBuf,
    pub samples: usize,
    pub sampling_rate: f64,
    pub interp: String,
    pub blinks: Vec<BlinkInterval>,
    pub blinks_stored: bool,
    pub samples_masked: usize,
    pub samples_interpolated: usize,
    pub bytes_written: usize,
    pub elapsed_ms: f64,
}

impl CleanStats {
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self
    }

    /// Feed this run into an aggregator
    pub fn aggregate(&self) -> CleaningStatsAggregator {
        let mut aggregator = CleaningStatsAggregator::new();
        aggregator.update_blinks(&self.blinks, self.sampling_rate, self.samples);
        aggregator.update_correction(self.samples_masked, self.samples_interpolated);
        aggregator
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("Cleaned {} -> {}", self.input.display(), self.output.display());
        println!("   ├─ Sampling rate: {} Hz", self.sampling_rate);
        println!("   ├─ Correction: {}", self.interp);
        println!(
            "   ├─ Blinks {}: {}",
            if self.blinks_stored { "stored" } else { "detected" },
            self.blinks.len()
        );
        println!("   ├─ Archive size: {} bytes", self.bytes_written);
        println!("   └─ Elapsed: {:.1} ms\n", self.elapsed_ms);
        print!("{}", self.aggregate().summary());
    }
}
