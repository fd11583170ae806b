//! Window lengths given either in seconds or in samples.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Window length
///
/// An integer is a sample count; a real number is seconds and is converted
/// through the sampling rate by truncation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowSpec {
    Samples(usize),
    Seconds(f64),
}

impl WindowSpec {
    /// Resolve to a sample count
    ///
    /// # Errors
    /// Negative or non-finite seconds.
    pub fn to_samples(self, sampling_rate: f64) -> Result<usize, ContractError> {
        match self {
            WindowSpec::Samples(n) => Ok(n),
            WindowSpec::Seconds(secs) => {
                if !(secs.is_finite() && secs >= 0.0) {
                    return Err(ContractError::contract_violation(
                        "window",
                        format!("window must be a non-negative number of seconds, got {secs}"),
                    ));
                }
                Ok((secs * sampling_rate) as usize)
            }
        }
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpec::Samples(n) => write!(f, "{n} samples"),
            WindowSpec::Seconds(s) => write!(f, "{s} s"),
        }
    }
}
