//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - contract invariants shared by every crate
//! - synthetic recording -> archive -> loader -> detect -> correct -> archive
//! - configuration-driven cleaning

#[cfg(test)]
mod contract_tests {
    use contracts::{BlinkInterval, ConfigVersion, PipelineConfig, RecordingInfo, SignalStore};

    #[test]
    fn test_default_config_version() {
        assert_eq!(PipelineConfig::default().version, ConfigVersion::V1);
    }

    #[test]
    fn test_interval_display() {
        let shown: Vec<String> = [BlinkInterval::new(2, 4), BlinkInterval::new(8, 8)]
            .iter()
            .map(|b| b.to_string())
            .collect();
        assert_eq!(shown, vec!["[2, 4]", "[8, 8]"]);
    }

    #[test]
    fn test_non_uniform_times_rejected() {
        let times = vec![0.0, 0.1, 0.25];
        let err = SignalStore::new(RecordingInfo::new(10.0), times, vec![[0.0; 3]; 3]).unwrap_err();
        assert!(err.is_contract_violation());
    }
}

#[cfg(test)]
mod e2e_tests {
    use blink_engine::{
        find_candidates, merge_candidates, BlinkCorrector, BlinkDetector, CorrectConfig,
        DetectConfig, InterpKind, WindowSpec,
    };
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{BlinkInterval, IndexRounding, Recording, RecordingInfo, SignalStore};
    use events::EventLocator;
    use ingestion::{load_archive, save_archive, RecordingLoader, SyntheticRecording};
    use observability::CleaningStatsAggregator;

    fn eleven_samples() -> SignalStore {
        let pupil = [5.0, 5.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 0.0, 5.0, 5.0];
        let channels = pupil.iter().map(|&p| [0.0, 0.0, p]).collect();
        SignalStore::from_channels(RecordingInfo::new(10.0), channels).unwrap()
    }

    /// Zero runs at 2..=4 and 8 stay separate at 10 Hz with a 0.1 s gap
    /// threshold, then each grows by one sample on the rising side.
    #[test]
    fn test_eleven_sample_scenario() {
        let signal = eleven_samples();
        let pupil = signal.pupil();

        let candidates = find_candidates(&pupil);
        let merged = merge_candidates(&candidates, signal.times(), 0.1);
        assert_eq!(
            merged,
            vec![BlinkInterval::new(2, 4), BlinkInterval::new(8, 8)]
        );

        let detector = BlinkDetector::new(DetectConfig {
            min_dist: 0.1,
            window: WindowSpec::Samples(1),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            detector.detect(&signal).unwrap(),
            vec![BlinkInterval::new(2, 5), BlinkInterval::new(8, 9)]
        );
    }

    #[test]
    fn test_eleven_sample_nan_mask() {
        let mut signal = eleven_samples();
        let blinks = [BlinkInterval::new(2, 4), BlinkInterval::new(8, 8)];
        BlinkCorrector::new(CorrectConfig::default())
            .correct(&mut signal, &blinks)
            .unwrap();

        let pupil = signal.pupil();
        for (i, p) in pupil.iter().enumerate() {
            let inside = blinks.iter().any(|b| b.contains(i));
            assert_eq!(p.is_nan(), inside, "sample {i}");
        }
    }

    #[test]
    fn test_synthetic_pipeline_through_archive() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw.pca");
        let clean_path = dir.path().join("clean.pca");

        let synthetic = SyntheticRecording::new(500.0, 6.0)
            .start_time(1234.0)
            .seed(42)
            .blink(1.0, 0.12, 0.03)
            .blink(1.18, 0.05, 0.0)
            .blink(4.0, 0.2, 0.04)
            .message(0.5, "TRIALID 1")
            .message(3.5, "TRIALID 2")
            .message(3.6, "RESPONSE left");
        let mut raw = synthetic.build().unwrap();
        raw.blinks.clear();
        save_archive(&raw, &raw_path, false).unwrap();

        let loader = RecordingLoader::new();
        let mut recording = loader.load(&raw_path).unwrap();
        assert_eq!(recording.signal.times(), raw.signal.times());
        assert_eq!(recording.messages, raw.messages);

        let detector = BlinkDetector::new(DetectConfig::default()).unwrap();
        assert!(detector.apply(&mut recording).unwrap().is_none());

        // the first two plateaus are closer than min_dist and merge
        assert_eq!(recording.blinks.len(), 2);
        let expected = synthetic.expected_blinks();
        assert!(recording.blinks[0].onset <= expected[0].onset);
        assert!(recording.blinks[0].offset >= expected[1].offset);
        assert!(recording.blinks[1].onset <= expected[2].onset);
        assert!(recording.blinks[1].offset >= expected[2].offset);

        let corrector = BlinkCorrector::new(CorrectConfig {
            interp: InterpKind::Spline(3),
            window: WindowSpec::Seconds(0.05),
        });
        let blinks = recording.blinks.clone();
        let report = corrector.correct(&mut recording.signal, &blinks).unwrap();
        assert_eq!(report.intervals, 2);
        assert!(report.samples_interpolated > report.samples_masked);
        assert!(recording.signal.pupil().iter().all(|p| p.is_finite()));

        save_archive(&recording, &clean_path, false).unwrap();
        let cleaned = load_archive(&clean_path).unwrap();
        assert_eq!(cleaned.blinks, recording.blinks);
        assert_eq!(cleaned.messages, recording.messages);

        let trials = EventLocator::new("^TRIALID")
            .unwrap()
            .find(&cleaned.messages, cleaned.signal.times())
            .unwrap();
        assert_eq!(trials.len(), 2);
        let idx = cleaned
            .signal
            .time_as_index(&trials, IndexRounding::Nearest);
        assert_eq!(idx, vec![250, 1750]);

        let mut stats = CleaningStatsAggregator::new();
        stats.update_blinks(&cleaned.blinks, cleaned.signal.sampling_rate(), cleaned.signal.len());
        stats.update_correction(report.samples_masked, report.samples_interpolated);
        assert_eq!(stats.summary().total_blinks, 2);
    }

    #[test]
    fn test_config_file_drives_cleaning() {
        let config = ConfigLoader::load_from_str(
            r#"
[detect]
min_dist = 0.0
window = 3
overwrite = false

[correct]
interp = "linear"
window = 10
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let mut recording: Recording = SyntheticRecording::new(250.0, 4.0)
            .blink(1.0, 0.1, 0.02)
            .blink(1.3, 0.06, 0.0)
            .build()
            .unwrap();
        let stored = recording.blinks.clone();

        let detector = BlinkDetector::new(config.detect.clone()).unwrap();
        let detected = detector.apply(&mut recording).unwrap().unwrap();
        assert_eq!(detected.len(), 2);
        assert_eq!(recording.blinks, stored);

        let report = BlinkCorrector::new(config.correct.clone())
            .correct(&mut recording.signal, &detected)
            .unwrap();
        assert_eq!(report.intervals, 2);
        assert!(recording.signal.pupil().iter().all(|p| *p > 0.0));
    }

    #[test]
    fn test_correction_error_reports_blink() {
        let mut recording = SyntheticRecording::new(100.0, 1.0)
            .blink(0.1, 0.05, 0.0)
            .build()
            .unwrap();
        for i in 0..10 {
            recording.signal.set_pupil(i, f64::NAN);
        }
        let blinks = recording.blinks.clone();
        let err = BlinkCorrector::new(CorrectConfig {
            interp: InterpKind::Linear,
            window: WindowSpec::Samples(5),
        })
        .correct(&mut recording.signal, &blinks)
        .unwrap_err();
        assert!(err.to_string().contains("[10, 14]"), "{err}");
    }
}
