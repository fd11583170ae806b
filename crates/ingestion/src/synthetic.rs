//! Synthetic recordings
//!
//! Generates a noisy pupil trace with blink-shaped dropouts for tests and
//! demos without tracker hardware.

use contracts::{
    BlinkInterval, ContractError, MessageEvent, Recording, RecordingInfo, Sample, SignalStore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Screen position the synthetic gaze fixates on (pixels)
const FIXATION: (f64, f64) = (960.0, 540.0);

/// One blink in a synthetic recording
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticBlink {
    /// Start of the zero plateau (seconds from recording start)
    pub onset_s: f64,
    /// Length of the zero plateau (seconds)
    pub duration_s: f64,
    /// Length of each linear edge between baseline and zero (seconds)
    pub ramp_s: f64,
}

/// Synthetic recording builder
#[derive(Debug, Clone)]
pub struct SyntheticRecording {
    sampling_rate: f64,
    duration_s: f64,
    start_time: f64,
    baseline: f64,
    noise: f64,
    seed: u64,
    blinks: Vec<SyntheticBlink>,
    messages: Vec<(f64, String)>,
}

impl SyntheticRecording {
    /// `duration_s` seconds at `sampling_rate` Hz, baseline pupil 4.0 with
    /// ±0.05 uniform noise
    pub fn new(sampling_rate: f64, duration_s: f64) -> Self {
        Self {
            sampling_rate,
            duration_s,
            start_time: 0.0,
            baseline: 4.0,
            noise: 0.05,
            seed: 0x5eed,
            blinks: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Tracker clock value of the first sample
    pub fn start_time(mut self, t: f64) -> Self {
        self.start_time = t;
        self
    }

    pub fn baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Peak amplitude of the uniform noise added outside blinks
    pub fn noise(mut self, amplitude: f64) -> Self {
        self.noise = amplitude;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Add a blink: zero plateau at `onset_s` lasting `duration_s`, with
    /// linear edges of `ramp_s` on both sides
    pub fn blink(mut self, onset_s: f64, duration_s: f64, ramp_s: f64) -> Self {
        self.blinks.push(SyntheticBlink {
            onset_s,
            duration_s,
            ramp_s,
        });
        self
    }

    /// Add a message at `time_s` seconds from recording start
    pub fn message(mut self, time_s: f64, text: impl Into<String>) -> Self {
        self.messages.push((time_s, text.into()));
        self
    }

    fn n_samples(&self) -> usize {
        (self.duration_s * self.sampling_rate).round() as usize
    }

    fn to_index(&self, seconds: f64) -> usize {
        (seconds * self.sampling_rate).round() as usize
    }

    /// Sample spans of the zero plateaus, in insertion order
    pub fn expected_blinks(&self) -> Vec<BlinkInterval> {
        self.blinks
            .iter()
            .map(|b| {
                let onset = self.to_index(b.onset_s);
                let len = self.to_index(b.duration_s).max(1);
                BlinkInterval::new(onset, onset + len - 1)
            })
            .collect()
    }

    /// Generate the recording
    ///
    /// Blinks are stored on the recording as the tracker's own blink list.
    ///
    /// # Errors
    /// - non-positive duration, baseline at or below the noise amplitude
    /// - a blink (with its edges) or message outside the recording
    pub fn build(&self) -> Result<Recording, ContractError> {
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(ContractError::contract_violation(
                "duration_s",
                format!("duration must be positive, got {}", self.duration_s),
            ));
        }
        if !(self.noise >= 0.0 && self.baseline > self.noise) {
            return Err(ContractError::contract_violation(
                "baseline",
                format!(
                    "baseline {} must exceed noise amplitude {}",
                    self.baseline, self.noise
                ),
            ));
        }

        let n = self.n_samples();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut channels: Vec<Sample> = (0..n)
            .map(|_| {
                let jitter = |rng: &mut StdRng, amp: f64| {
                    if amp > 0.0 {
                        rng.random_range(-amp..amp)
                    } else {
                        0.0
                    }
                };
                [
                    FIXATION.0 + jitter(&mut rng, 2.0),
                    FIXATION.1 + jitter(&mut rng, 2.0),
                    self.baseline + jitter(&mut rng, self.noise),
                ]
            })
            .collect();

        let expected = self.expected_blinks();
        for (i, (shape, plateau)) in self.blinks.iter().zip(&expected).enumerate() {
            let ramp = self.to_index(shape.ramp_s);
            if plateau.onset < ramp || plateau.offset + ramp >= n {
                return Err(ContractError::contract_violation(
                    format!("blinks[{i}]"),
                    format!("blink {plateau} with {ramp}-sample edges exceeds {n} samples"),
                ));
            }

            let step = self.baseline / (ramp + 1) as f64;
            for k in 0..ramp {
                channels[plateau.onset - ramp + k][2] = step * (ramp - k) as f64;
                channels[plateau.offset + 1 + k][2] = step * (k + 1) as f64;
            }
            for sample in &mut channels[plateau.onset..=plateau.offset] {
                *sample = [f64::NAN, f64::NAN, 0.0];
            }
        }

        let mut messages = Vec::with_capacity(self.messages.len());
        for (i, (t, text)) in self.messages.iter().enumerate() {
            let sample = self.to_index(*t);
            if !(*t >= 0.0) || sample >= n {
                return Err(ContractError::contract_violation(
                    format!("messages[{i}]"),
                    format!("message at {t} s lies outside the recording"),
                ));
            }
            messages.push(MessageEvent::new(sample, text.clone()));
        }

        let mut info = RecordingInfo::new(self.sampling_rate);
        info.attributes
            .insert("source".to_string(), "synthetic".to_string());
        info.attributes
            .insert("seed".to_string(), self.seed.to_string());
        let times = (0..n)
            .map(|i| self.start_time + i as f64 / self.sampling_rate)
            .collect();
        let signal = SignalStore::new(info, times, channels)?;

        debug!(
            samples = n,
            blinks = expected.len(),
            messages = messages.len(),
            "synthetic recording generated"
        );

        Ok(Recording {
            signal,
            blinks: expected,
            saccades: Vec::new(),
            messages,
        })
    }
}
