//! # Events
//!
//! Locate experiment events in the message stream of a recording.
//!
//! Matching uses regex search semantics: a message matches when the pattern
//! occurs anywhere inside it. Results keep the order of the message stream.
//!
//! ```ignore
//! use events::EventLocator;
//!
//! let locator = EventLocator::new("^TRIALID")?;
//! let onsets = locator.find(&recording.messages, recording.signal.times())?;
//! ```

use contracts::{ContractError, MessageEvent, Recording};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

/// A matched message with its timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMatch {
    /// Sample index the message was logged at
    pub sample: usize,
    /// Timestamp in seconds, taken from the recording's time vector
    pub time: f64,
    /// Full message text
    pub message: String,
}

/// Regex-driven event locator
#[derive(Debug, Clone)]
pub struct EventLocator {
    pattern: Regex,
}

impl EventLocator {
    /// Compile `pattern`
    ///
    /// # Errors
    /// Contract violation when the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, ContractError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ContractError::contract_violation("pattern", e.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Timestamps of all matching messages
    pub fn find(&self, messages: &[MessageEvent], times: &[f64]) -> Result<Vec<f64>, ContractError> {
        Ok(self
            .find_with_messages(messages, times)?
            .into_iter()
            .map(|m| m.time)
            .collect())
    }

    /// Matching messages with their timestamps
    ///
    /// # Errors
    /// Contract violation when a matching message references a sample
    /// outside `times`.
    #[instrument(name = "events_find", skip_all, fields(pattern = %self.pattern, messages = messages.len()))]
    pub fn find_with_messages(
        &self,
        messages: &[MessageEvent],
        times: &[f64],
    ) -> Result<Vec<EventMatch>, ContractError> {
        let mut matches = Vec::new();
        for (i, event) in messages.iter().enumerate() {
            if !self.pattern.is_match(&event.message) {
                continue;
            }
            let time = times.get(event.sample).copied().ok_or_else(|| {
                ContractError::contract_violation(
                    format!("messages[{i}]"),
                    format!(
                        "sample {} outside time vector of {} samples",
                        event.sample,
                        times.len()
                    ),
                )
            })?;
            matches.push(EventMatch {
                sample: event.sample,
                time,
                message: event.message.clone(),
            });
        }

        debug!(matched = matches.len(), "event search finished");
        observability::record_events_located(matches.len());
        Ok(matches)
    }

    /// Search the messages of a loaded recording
    pub fn find_in(&self, recording: &Recording) -> Result<Vec<EventMatch>, ContractError> {
        self.find_with_messages(&recording.messages, recording.signal.times())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> Vec<MessageEvent> {
        vec![
            MessageEvent::new(3, "TRIALID 1"),
            MessageEvent::new(1, "DISPLAY ON"),
            MessageEvent::new(7, "TRIALID 2"),
            MessageEvent::new(5, "!V TRIAL_VAR condition TRIALID"),
        ]
    }

    fn times() -> Vec<f64> {
        (0..10).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn test_unanchored_search_keeps_stream_order() {
        let locator = EventLocator::new("TRIALID").unwrap();
        let found = locator.find(&messages(), &times()).unwrap();
        assert_eq!(found, vec![101.5, 103.5, 102.5]);
    }

    #[test]
    fn test_anchored_pattern() {
        let locator = EventLocator::new("^TRIALID \\d+$").unwrap();
        let found = locator.find_with_messages(&messages(), &times()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].sample, 3);
        assert_eq!(found[1].message, "TRIALID 2");
        assert_eq!(found[1].time, 103.5);
    }

    #[test]
    fn test_no_match_is_empty() {
        let locator = EventLocator::new("SYNCTIME").unwrap();
        assert!(locator.find(&messages(), &times()).unwrap().is_empty());
        assert!(locator.find(&[], &times()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = EventLocator::new("TRIAL(").unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_out_of_range_sample_rejected() {
        let locator = EventLocator::new("late").unwrap();
        let err = locator
            .find(&[MessageEvent::new(10, "late marker")], &times())
            .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_out_of_range_non_matching_message_ignored() {
        let locator = EventLocator::new("TRIALID").unwrap();
        let mut msgs = messages();
        msgs.push(MessageEvent::new(99, "unrelated"));
        assert_eq!(locator.find(&msgs, &times()).unwrap().len(), 3);
    }

    #[test]
    fn test_match_serializes() {
        let m = EventMatch {
            sample: 2,
            time: 1.25,
            message: "GO".to_string(),
        };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"sample":2,"time":1.25,"message":"GO"}"#);
    }
}
