//! # Blink Engine
//!
//! Blink detection and correction on the pupil channel.
//!
//! Responsible for:
//! - locating zero-valued pupil runs and merging close neighbours
//! - extending blinks along the smoothed pupil slope
//! - NaN masking or interpolating the pupil across each blink
//!
//! ## Usage
//!
//! ```ignore
//! use blink_engine::{BlinkCorrector, BlinkDetector, CorrectConfig, DetectConfig};
//!
//! let detector = BlinkDetector::new(DetectConfig::default())?;
//! detector.apply(&mut recording)?;
//!
//! let corrector = BlinkCorrector::new(CorrectConfig {
//!     interp: InterpKind::Spline(3),
//!     ..Default::default()
//! });
//! let report = corrector.correct(&mut recording.signal, &recording.blinks)?;
//! ```

mod banded;
mod correct;
mod detect;
pub mod interp;
pub mod smooth;

pub use correct::{BlinkCorrector, CorrectionReport};
pub use detect::{extend_interval, find_candidates, merge_candidates, BlinkDetector};
pub use interp::{InterpError, Interpolant};

// Re-export contracts types
pub use contracts::{BlinkInterval, CorrectConfig, DetectConfig, InterpKind, WindowSpec};
