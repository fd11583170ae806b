//! Blink detection on the pupil channel.
//!
//! Three steps, applied in order:
//! 1. label maximal runs of `pupil == 0` as candidate blinks
//! 2. merge neighbouring candidates closer than `min_dist` seconds
//! 3. extend each blink outward along the smoothed pupil slope
//!
//! Extended blinks that run into each other are coalesced so the output
//! never contains overlapping intervals.

use contracts::{BlinkInterval, ContractError, DetectConfig, Recording, SignalStore};
use tracing::{debug, info, instrument};

use crate::smooth::{offset_extension, onset_extension};

/// Blink detector
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    config: DetectConfig,
}

impl BlinkDetector {
    /// Create a detector
    ///
    /// # Errors
    /// `min_dist` negative or not finite.
    pub fn new(config: DetectConfig) -> Result<Self, ContractError> {
        if !(config.min_dist.is_finite() && config.min_dist >= 0.0) {
            return Err(ContractError::contract_violation(
                "detect.min_dist",
                format!("min_dist must be >= 0, got {}", config.min_dist),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Detect blinks in a signal without touching it
    pub fn detect(&self, signal: &SignalStore) -> Result<Vec<BlinkInterval>, ContractError> {
        self.detect_raw(&signal.pupil(), signal.times(), signal.sampling_rate())
    }

    /// Detect blinks from bare pupil/time vectors
    ///
    /// # Errors
    /// - `pupil` and `times` lengths differ
    /// - smoothing window resolves to zero samples
    #[instrument(
        name = "blink_detect",
        skip(self, pupil, times),
        fields(samples = pupil.len(), min_dist = self.config.min_dist)
    )]
    pub fn detect_raw(
        &self,
        pupil: &[f64],
        times: &[f64],
        sampling_rate: f64,
    ) -> Result<Vec<BlinkInterval>, ContractError> {
        if pupil.len() != times.len() {
            return Err(ContractError::contract_violation(
                "times",
                format!(
                    "pupil has {} samples but times has {}",
                    pupil.len(),
                    times.len()
                ),
            ));
        }

        let window = self.config.window.to_samples(sampling_rate)?;
        if window == 0 {
            return Err(ContractError::contract_violation(
                "detect.window",
                format!(
                    "smoothing window {} is shorter than one sample at {sampling_rate} Hz",
                    self.config.window
                ),
            ));
        }

        let candidates = find_candidates(pupil);
        if candidates.is_empty() {
            debug!("no zero-pupil samples, nothing to detect");
            return Ok(candidates);
        }

        let merged = merge_candidates(&candidates, times, self.config.min_dist);
        let extended: Vec<BlinkInterval> = merged
            .iter()
            .map(|blink| extend_interval(pupil, *blink, window))
            .collect();
        let blinks = coalesce_overlaps(extended);

        debug!(
            candidates = candidates.len(),
            merged = merged.len(),
            blinks = blinks.len(),
            window_samples = window,
            "blink detection finished"
        );
        if self.config.verbose {
            info!(count = blinks.len(), "{} blinks detected", blinks.len());
        }
        observability::record_detection(candidates.len(), &blinks, sampling_rate);

        Ok(blinks)
    }

    /// Detect on a recording, honouring the `overwrite` flag
    ///
    /// With `overwrite` the recording's blink list is replaced and `None` is
    /// returned; otherwise the recording is untouched and the blinks are
    /// returned.
    pub fn apply(
        &self,
        recording: &mut Recording,
    ) -> Result<Option<Vec<BlinkInterval>>, ContractError> {
        let blinks = self.detect(&recording.signal)?;
        if self.config.overwrite {
            recording.blinks = blinks;
            Ok(None)
        } else {
            Ok(Some(blinks))
        }
    }
}

/// Maximal runs of exactly-zero pupil samples
pub fn find_candidates(pupil: &[f64]) -> Vec<BlinkInterval> {
    let mut candidates = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &value) in pupil.iter().enumerate() {
        match (value == 0.0, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                candidates.push(BlinkInterval::new(start, i - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        candidates.push(BlinkInterval::new(start, pupil.len() - 1));
    }

    candidates
}

/// Merge neighbours whose gap `times[next.onset] - times[prev.offset]` is
/// strictly below `min_dist`
///
/// A merge only replaces the left offset with the right one, so the gap to
/// the following candidate is the original one; a single sweep therefore
/// produces the same grouping as rescanning from the start after every merge.
pub fn merge_candidates(
    candidates: &[BlinkInterval],
    times: &[f64],
    min_dist: f64,
) -> Vec<BlinkInterval> {
    let mut merged = Vec::with_capacity(candidates.len());
    let mut iter = candidates.iter().copied();
    let Some(mut pending) = iter.next() else {
        return merged;
    };

    for next in iter {
        if times[next.onset] - times[pending.offset] < min_dist {
            pending.offset = next.offset;
        } else {
            merged.push(pending);
            pending = next;
        }
    }
    merged.push(pending);

    merged
}

/// Move both boundaries outward until the smoothed slope flattens
pub fn extend_interval(pupil: &[f64], blink: BlinkInterval, window: usize) -> BlinkInterval {
    let back = onset_extension(pupil, blink.onset, window);
    let forward = offset_extension(pupil, blink.offset, window);
    BlinkInterval::new(blink.onset - back, blink.offset + forward)
}

/// Sort by onset and fuse intervals sharing samples
fn coalesce_overlaps(mut blinks: Vec<BlinkInterval>) -> Vec<BlinkInterval> {
    blinks.sort_unstable_by_key(|b| b.onset);
    let mut out: Vec<BlinkInterval> = Vec::with_capacity(blinks.len());
    for blink in blinks {
        match out.last_mut() {
            Some(last) if last.overlaps(&blink) => {
                last.offset = last.offset.max(blink.offset);
            }
            _ => out.push(blink),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{RecordingInfo, WindowSpec};

    fn times(n: usize, rate: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 / rate).collect()
    }

    fn detector(min_dist: f64, window: usize) -> BlinkDetector {
        BlinkDetector::new(DetectConfig {
            min_dist,
            window: WindowSpec::Samples(window),
            overwrite: true,
            verbose: false,
        })
        .unwrap()
    }

    /// Rescan-from-the-top merge, kept as the executable definition
    fn merge_restarting(
        candidates: &[BlinkInterval],
        times: &[f64],
        min_dist: f64,
    ) -> Vec<BlinkInterval> {
        let mut blinks = candidates.to_vec();
        loop {
            let hit = blinks
                .windows(2)
                .position(|w| times[w[1].onset] - times[w[0].offset] < min_dist);
            match hit {
                Some(i) => {
                    blinks[i].offset = blinks[i + 1].offset;
                    blinks.remove(i + 1);
                }
                None => return blinks,
            }
        }
    }

    #[test]
    fn test_no_zero_samples_yields_nothing() {
        let pupil = vec![3.0, 4.0, f64::NAN, 5.0, 4.5];
        let result = detector(0.1, 1)
            .detect_raw(&pupil, &times(5, 100.0), 100.0)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_pupil_is_not_an_error() {
        let result = detector(0.1, 1).detect_raw(&[], &[], 100.0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_run_candidate() {
        let mut pupil = vec![4.0; 30];
        for v in &mut pupil[12..17] {
            *v = 0.0;
        }
        assert_eq!(find_candidates(&pupil), vec![BlinkInterval::new(12, 16)]);
    }

    #[test]
    fn test_runs_touching_edges_and_length_one() {
        let pupil = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(
            find_candidates(&pupil),
            vec![
                BlinkInterval::new(0, 1),
                BlinkInterval::new(3, 3),
                BlinkInterval::new(5, 5)
            ]
        );
    }

    #[test]
    fn test_merge_below_threshold() {
        let t = times(100, 100.0);
        let candidates = [BlinkInterval::new(10, 20), BlinkInterval::new(25, 30)];
        // gap 0.05 s < 0.1 s
        assert_eq!(
            merge_candidates(&candidates, &t, 0.1),
            vec![BlinkInterval::new(10, 30)]
        );
    }

    #[test]
    fn test_merge_at_threshold_keeps_separate() {
        let t = times(100, 10.0);
        let candidates = [BlinkInterval::new(10, 20), BlinkInterval::new(21, 30)];
        // gap exactly 0.1 s is not < 0.1 s
        assert_eq!(merge_candidates(&candidates, &t, 0.1), candidates.to_vec());
    }

    #[test]
    fn test_merge_idempotent() {
        let t = times(200, 100.0);
        let candidates = [
            BlinkInterval::new(5, 8),
            BlinkInterval::new(10, 12),
            BlinkInterval::new(40, 41),
            BlinkInterval::new(45, 50),
            BlinkInterval::new(120, 130),
        ];
        let once = merge_candidates(&candidates, &t, 0.05);
        let twice = merge_candidates(&once, &t, 0.05);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sweep_matches_restarting_merge() {
        let t = times(400, 100.0);
        let candidates: Vec<BlinkInterval> = [
            (3, 4),
            (6, 6),
            (9, 15),
            (30, 31),
            (33, 33),
            (35, 40),
            (90, 91),
            (100, 120),
            (124, 124),
            (200, 260),
            (262, 263),
            (390, 399),
        ]
        .into_iter()
        .map(BlinkInterval::from)
        .collect();

        for min_dist in [0.0, 0.01, 0.025, 0.03, 0.05, 0.1, 0.5, 5.0] {
            assert_eq!(
                merge_candidates(&candidates, &t, min_dist),
                merge_restarting(&candidates, &t, min_dist),
                "min_dist = {min_dist}"
            );
        }
    }

    #[test]
    fn test_zero_min_dist_never_merges() {
        let t = times(10, 10.0);
        let candidates = [BlinkInterval::new(1, 2), BlinkInterval::new(3, 4)];
        assert_eq!(merge_candidates(&candidates, &t, 0.0).len(), 2);
    }

    #[test]
    fn test_reference_scenario_two_blinks() {
        let pupil = [5.0, 5.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 0.0, 5.0, 5.0];
        let t = times(pupil.len(), 10.0);

        let candidates = find_candidates(&pupil);
        assert_eq!(
            candidates,
            vec![BlinkInterval::new(2, 4), BlinkInterval::new(8, 8)]
        );
        assert_eq!(merge_candidates(&candidates, &t, 0.05), candidates);

        let blinks = detector(0.05, 1).detect_raw(&pupil, &t, 10.0).unwrap();
        assert_eq!(blinks.len(), 2);
        assert_eq!(blinks[0], BlinkInterval::new(2, 5));
        assert_eq!(blinks[1], BlinkInterval::new(8, 9));
    }

    #[test]
    fn test_extension_covers_sloped_edges() {
        // 1 kHz trace: flat 5.0, linear ramp down over 8 samples, zeros, ramp up
        let mut pupil = vec![5.0; 200];
        for i in 0..8 {
            pupil[92 + i] = 5.0 - 0.6 * (i + 1) as f64;
        }
        for v in &mut pupil[100..110] {
            *v = 0.0;
        }
        for i in 0..8 {
            pupil[110 + i] = 0.6 * (i + 1) as f64;
        }
        let t = times(pupil.len(), 1000.0);

        let blinks = detector(0.1, 2).detect_raw(&pupil, &t, 1000.0).unwrap();
        assert_eq!(blinks.len(), 1);
        let blink = blinks[0];
        assert!(blink.onset <= 93 && blink.onset >= 85, "onset {}", blink.onset);
        assert!(blink.offset >= 116 && blink.offset <= 125, "offset {}", blink.offset);
    }

    #[test]
    fn test_extended_neighbours_are_coalesced() {
        let blinks = coalesce_overlaps(vec![
            BlinkInterval::new(10, 20),
            BlinkInterval::new(5, 12),
            BlinkInterval::new(30, 31),
            BlinkInterval::new(31, 35),
        ]);
        assert_eq!(
            blinks,
            vec![BlinkInterval::new(5, 20), BlinkInterval::new(30, 35)]
        );
    }

    #[test]
    fn test_output_never_overlaps() {
        // two blinks separated by a short shallow ramp, extended into each other
        let mut pupil = vec![6.0; 120];
        for v in &mut pupil[40..45] {
            *v = 0.0;
        }
        for (k, v) in pupil[45..55].iter_mut().enumerate() {
            *v = 0.5 * (k + 1) as f64;
        }
        for v in &mut pupil[55..60] {
            *v = 0.0;
        }
        let t = times(pupil.len(), 500.0);
        let blinks = detector(0.0, 1).detect_raw(&pupil, &t, 500.0).unwrap();
        for w in blinks.windows(2) {
            assert!(w[0].offset < w[1].onset, "{:?}", blinks);
        }
    }

    #[test]
    fn test_negative_min_dist_rejected() {
        let err = BlinkDetector::new(DetectConfig {
            min_dist: -0.1,
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_zero_sample_window_rejected() {
        let det = BlinkDetector::new(DetectConfig {
            window: WindowSpec::Seconds(0.01),
            ..Default::default()
        })
        .unwrap();
        // 0.01 s at 50 Hz truncates to 0 samples
        let err = det.detect_raw(&[1.0, 0.0], &[0.0, 0.02], 50.0).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_apply_overwrite_semantics() {
        let mut pupil = vec![[0.0, 0.0, 4.0]; 50];
        for s in &mut pupil[20..25] {
            s[2] = 0.0;
        }
        let signal = SignalStore::from_channels(RecordingInfo::new(100.0), pupil).unwrap();
        let mut rec = Recording::new(signal);
        rec.blinks = vec![BlinkInterval::new(0, 1)];

        let keep = BlinkDetector::new(DetectConfig {
            window: WindowSpec::Samples(1),
            overwrite: false,
            ..Default::default()
        })
        .unwrap();
        let returned = keep.apply(&mut rec).unwrap().unwrap();
        assert_eq!(returned, vec![BlinkInterval::new(20, 25)]);
        assert_eq!(rec.blinks, vec![BlinkInterval::new(0, 1)]);

        let replace = BlinkDetector::new(DetectConfig {
            window: WindowSpec::Samples(1),
            overwrite: true,
            ..Default::default()
        })
        .unwrap();
        assert!(replace.apply(&mut rec).unwrap().is_none());
        assert_eq!(rec.blinks, returned);
    }

    #[test]
    fn test_blinks_touching_both_signal_ends() {
        let pupil = [0.0, 0.0, 3.0, 4.0, 5.0, 5.0, 5.0, 4.0, 3.0, 0.0];
        let t = times(pupil.len(), 100.0);
        let blinks = detector(0.0, 1).detect_raw(&pupil, &t, 100.0).unwrap();
        // nothing before sample 0 or after sample 9 to extend into
        assert_eq!(
            blinks,
            vec![BlinkInterval::new(0, 4), BlinkInterval::new(7, 9)]
        );
    }

    #[test]
    fn test_window_wider_than_signal() {
        let pupil = [5.0, 5.0, 0.0, 5.0, 5.0];
        let t = times(pupil.len(), 100.0);
        for window in [WindowSpec::Seconds(1e30), WindowSpec::Samples(usize::MAX / 2)] {
            let det = BlinkDetector::new(DetectConfig {
                min_dist: 0.1,
                window,
                ..Default::default()
            })
            .unwrap();
            let blinks = det.detect_raw(&pupil, &t, 100.0).unwrap();
            assert_eq!(blinks, vec![BlinkInterval::new(2, 2)], "window {window}");
        }
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn detect_logged(verbose: bool) -> (Vec<BlinkInterval>, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let pupil = [5.0, 0.0, 5.0, 5.0, 5.0, 0.0, 0.0, 5.0];
        let t = times(pupil.len(), 100.0);
        let det = BlinkDetector::new(DetectConfig {
            min_dist: 0.0,
            window: WindowSpec::Samples(1),
            overwrite: true,
            verbose,
        })
        .unwrap();
        let blinks = tracing::subscriber::with_default(subscriber, || {
            det.detect_raw(&pupil, &t, 100.0).unwrap()
        });

        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (blinks, log)
    }

    #[test]
    fn test_verbose_logs_count_only() {
        let (quiet_blinks, quiet_log) = detect_logged(false);
        let (loud_blinks, loud_log) = detect_logged(true);

        assert_eq!(quiet_blinks, loud_blinks);
        assert_eq!(loud_blinks.len(), 2);
        assert!(!quiet_log.contains("blinks detected"), "{quiet_log}");
        assert!(loud_log.contains("2 blinks detected"), "{loud_log}");
    }
}
