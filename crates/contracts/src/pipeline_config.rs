//! Cleaning pipeline configuration contracts shared across crates.

use serde::{Deserialize, Serialize};

use crate::{InterpKind, WindowSpec};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete cleaning pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Blink detection settings
    #[serde(default)]
    pub detect: DetectConfig,

    /// Blink correction settings
    #[serde(default)]
    pub correct: CorrectConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Blink detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Minimum gap (seconds) between two blinks; closer blinks are merged
    #[serde(default = "default_min_dist")]
    pub min_dist: f64,

    /// Moving-average window used for slope-based boundary extension
    #[serde(default = "default_detect_window")]
    pub window: WindowSpec,

    /// Replace the recording's stored blinks with the detected ones
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Log the number of detected blinks at info level
    #[serde(default)]
    pub verbose: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_dist: default_min_dist(),
            window: default_detect_window(),
            overwrite: true,
            verbose: false,
        }
    }
}

/// Blink correction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectConfig {
    /// Interpolation kind
    #[serde(default)]
    pub interp: InterpKind,

    /// Margin on each side of a blink used for interpolation anchors
    /// (ignored for NaN masking)
    #[serde(default = "default_correct_window")]
    pub window: WindowSpec,
}

impl Default for CorrectConfig {
    fn default() -> Self {
        Self {
            interp: InterpKind::default(),
            window: default_correct_window(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Allow replacing an existing archive
    #[serde(default)]
    pub overwrite: bool,
}

fn default_min_dist() -> f64 {
    0.1
}

fn default_detect_window() -> WindowSpec {
    WindowSpec::Seconds(0.01)
}

fn default_correct_window() -> WindowSpec {
    WindowSpec::Seconds(0.05)
}

fn default_true() -> bool {
    true
}
