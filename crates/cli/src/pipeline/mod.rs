//! Cleaning pipeline orchestration.

mod cleaner;
mod stats;

pub use cleaner::{CleaningOutcome, CleaningPipeline};
pub use stats::CleanStats;
