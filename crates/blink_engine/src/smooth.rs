//! Smoothing and slope search used for blink boundary extension.

/// Search width in units of the smoothing window
pub const SEARCH_WINDOWS: usize = 10;

/// Samples searched on each side, saturating for windows wider than memory
fn search_width(window: usize) -> usize {
    window.saturating_mul(SEARCH_WINDOWS)
}

/// Simple moving average, valid mode
///
/// Only full windows are produced: the output has `data.len() - window + 1`
/// elements, or none when the input is shorter than the window. A NaN only
/// poisons the windows that contain it.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || data.len() < window {
        return Vec::new();
    }
    let scale = 1.0 / window as f64;
    data.windows(window)
        .map(|w| w.iter().map(|v| v * scale).sum())
        .collect()
}

/// First difference `out[i] = data[i + 1] - data[i]`
pub fn first_difference(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Samples to move the onset back by
///
/// Scans the smoothed slope backward from `onset` over at most
/// `SEARCH_WINDOWS * window` preceding samples and stops at the first
/// non-negative step. When the slope never flattens the whole difference
/// span is taken.
pub fn onset_extension(pupil: &[f64], onset: usize, window: usize) -> usize {
    let start = onset.saturating_sub(search_width(window));
    let slope = first_difference(&moving_average(&pupil[start..onset], window));
    slope
        .iter()
        .rev()
        .position(|d| *d >= 0.0)
        .unwrap_or(slope.len())
}

/// Samples to move the offset forward by
///
/// Forward counterpart of [`onset_extension`]: the segment starts at
/// `offset` itself and the scan stops at the first non-positive step.
pub fn offset_extension(pupil: &[f64], offset: usize, window: usize) -> usize {
    let end = offset
        .saturating_add(search_width(window))
        .min(pupil.len());
    if offset >= end {
        return 0;
    }
    let slope = first_difference(&moving_average(&pupil[offset..end], window));
    slope
        .iter()
        .position(|d| *d <= 0.0)
        .unwrap_or(slope.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_valid_mode() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out.len(), 3);
        assert!((out[0] - 1.5).abs() < 1e-12);
        assert!((out[2] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_short_input() {
        assert!(moving_average(&[1.0, 2.0], 3).is_empty());
        assert!(moving_average(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_moving_average_nan_is_local() {
        let out = moving_average(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!((out[3] - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_onset_extension_follows_falling_slope() {
        // flat, then falling into the blink at index 8
        let pupil = [5.0, 5.0, 5.0, 5.0, 5.0, 4.0, 3.0, 2.0, 0.0];
        // diffs before onset: [0,0,0,0,-1,-1,-1]; reversed first >= 0 at 3
        assert_eq!(onset_extension(&pupil, 8, 1), 3);
    }

    #[test]
    fn test_offset_extension_follows_rising_slope() {
        let pupil = [0.0, 1.0, 3.0, 5.0, 5.0, 5.0];
        // diffs from offset 0: [1,2,2,0,0]; first <= 0 at 3
        assert_eq!(offset_extension(&pupil, 0, 1), 3);
    }

    #[test]
    fn test_no_flattening_takes_full_span() {
        let pupil = [9.0, 8.0, 7.0, 6.0, 0.0];
        // diffs [-1,-1,-1] never >= 0
        assert_eq!(onset_extension(&pupil, 4, 1), 3);
    }

    #[test]
    fn test_extension_clamped_at_signal_edges() {
        let pupil = [0.0, 0.0, 5.0];
        assert_eq!(onset_extension(&pupil, 0, 4), 0);
        assert_eq!(offset_extension(&pupil, 2, 4), 0);
        assert_eq!(offset_extension(&pupil, 3, 4), 0);
    }

    #[test]
    fn test_huge_window_saturates() {
        let pupil = [5.0, 5.0, 0.0, 5.0, 5.0];
        for window in [usize::MAX, usize::MAX / 2, usize::MAX / SEARCH_WINDOWS + 1] {
            assert_eq!(onset_extension(&pupil, 2, window), 0);
            assert_eq!(offset_extension(&pupil, 2, window), 0);
        }
        assert_eq!(search_width(usize::MAX), usize::MAX);
    }
}
