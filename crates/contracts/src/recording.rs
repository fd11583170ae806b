//! Recording - loader output
//!
//! Bundles the signal with the event lists that travel alongside it.

use crate::{BlinkInterval, ContractError, MessageEvent, SaccadeInterval, SignalStore};

/// A fully loaded eye-tracker recording
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Time series (mutable pupil column)
    pub signal: SignalStore,

    /// Authoritative blink list (tracker-detected or overwritten by detection)
    pub blinks: Vec<BlinkInterval>,

    /// Saccade list, passed through unmodified
    pub saccades: Vec<SaccadeInterval>,

    /// Message stream
    pub messages: Vec<MessageEvent>,
}

impl Recording {
    /// Recording with no events attached
    pub fn new(signal: SignalStore) -> Self {
        Self {
            signal,
            blinks: Vec::new(),
            saccades: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Check that every event references a sample inside the signal
    pub fn validate(&self) -> Result<(), ContractError> {
        let n = self.signal.len();

        let check = |field: &str, intervals: &[crate::SampleInterval]| {
            for (i, iv) in intervals.iter().enumerate() {
                if iv.onset > iv.offset || iv.offset >= n {
                    return Err(ContractError::contract_violation(
                        format!("{field}[{i}]"),
                        format!("interval {iv} outside recording of {n} samples"),
                    ));
                }
            }
            Ok(())
        };
        check("blinks", &self.blinks)?;
        check("saccades", &self.saccades)?;

        if let Some((i, msg)) = self
            .messages
            .iter()
            .enumerate()
            .find(|(_, m)| m.sample >= n)
        {
            return Err(ContractError::contract_violation(
                format!("messages[{i}]"),
                format!("sample {} outside recording of {n} samples", msg.sample),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Display for Recording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Recording | {} samples>", self.signal.len())
    }
}
