//! MessageEvent - experiment markers embedded in the recording.

use serde::{Deserialize, Serialize};

/// A text marker logged at a given sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Sample index the message was logged at
    pub sample: usize,

    /// Message text
    pub message: String,
}

impl MessageEvent {
    pub fn new(sample: usize, message: impl Into<String>) -> Self {
        Self {
            sample,
            message: message.into(),
        }
    }
}
