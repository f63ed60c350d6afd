//! Destruction policies.

use serde::{Deserialize, Serialize};

/// When a link destroys itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestructionPolicy {
    /// Destroy `seconds` after the first successful open.
    AfterDuration {
        /// Countdown length in seconds.
        seconds: u32,
    },
    /// Destroy as soon as the first view has received the document.
    AfterFirstView,
}

impl DestructionPolicy {
    /// Short label for logs and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AfterDuration { .. } => "after_duration",
            Self::AfterFirstView => "after_first_view",
        }
    }

    /// Human-readable policy summary for the administrator listing.
    pub fn summary(&self) -> String {
        match self {
            Self::AfterDuration { seconds } if seconds % 60 == 0 => {
                format!("{} min after opening", seconds / 60)
            }
            Self::AfterDuration { seconds } => format!("{seconds} s after opening"),
            Self::AfterFirstView => "after first view".to_string(),
        }
    }

    /// Countdown length, if this policy is time-boxed.
    pub fn duration_seconds(&self) -> Option<u32> {
        match self {
            Self::AfterDuration { seconds } => Some(*seconds),
            Self::AfterFirstView => None,
        }
    }
}
