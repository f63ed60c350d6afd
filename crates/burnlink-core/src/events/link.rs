//! Link lifecycle events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::LinkId;

/// Events related to a protected link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkEvent {
    /// The protected document was rendered for a viewer.
    Opened {
        /// The link that was opened.
        link_id: LinkId,
        /// Display name of the document.
        file_name: String,
        /// Address the administrator asked to be notified at.
        notify_target: String,
        /// When the countdown started (first successful open).
        opened_at: DateTime<Utc>,
        /// Whether this was the first successful open.
        first_view: bool,
    },
    /// The display surface detected a capture attempt.
    CaptureAttempted {
        /// The link being viewed.
        link_id: LinkId,
        /// Display name of the document.
        file_name: String,
        /// Address the administrator asked to be notified at.
        notify_target: String,
        /// Attempts recorded so far, when the link still exists.
        attempts: Option<u32>,
        /// When the attempt was reported.
        at: DateTime<Utc>,
    },
}

impl LinkEvent {
    /// The link this event concerns.
    pub fn link_id(&self) -> &LinkId {
        match self {
            Self::Opened { link_id, .. } | Self::CaptureAttempted { link_id, .. } => link_id,
        }
    }

    /// Address the event should be delivered to.
    pub fn notify_target(&self) -> &str {
        match self {
            Self::Opened { notify_target, .. } | Self::CaptureAttempted { notify_target, .. } => {
                notify_target
            }
        }
    }

    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opened { .. } => "opened",
            Self::CaptureAttempted { .. } => "capture_attempted",
        }
    }
}
