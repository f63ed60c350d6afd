//! Link record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use burnlink_core::types::id::LinkId;

use super::document::Document;
use super::payload::RenderPayload;
use super::policy::DestructionPolicy;
use super::watermark::WatermarkPlacement;

/// Lifecycle state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum LinkState {
    /// Created, never opened.
    Active,
    /// Opened at least once; the countdown runs from `opened_at`.
    Opened {
        /// First successful open.
        opened_at: DateTime<Utc>,
    },
    /// Destroyed. Stores never hand out a record in this state.
    Destroyed,
}

impl LinkState {
    /// Short label for logs and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Opened { .. } => "opened",
            Self::Destroyed => "destroyed",
        }
    }
}

/// A protected link: the unit of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Capability token and lookup key.
    pub id: LinkId,
    /// The protected document.
    pub document: Document,
    /// Display name of the document.
    pub file_name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Watermark overlay, in editor order.
    pub watermarks: Vec<WatermarkPlacement>,
    /// Destruction policy.
    pub policy: DestructionPolicy,
    /// Address notified when the document is opened.
    pub notify_target: String,
    /// Lifecycle state.
    pub state: LinkState,
    /// Capture attempts reported while the link was open.
    #[serde(default)]
    pub capture_attempts: u32,
}

impl LinkRecord {
    /// Create a new, never-opened link.
    pub fn new(
        id: LinkId,
        document: Document,
        file_name: impl Into<String>,
        watermarks: Vec<WatermarkPlacement>,
        policy: DestructionPolicy,
        notify_target: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document,
            file_name: file_name.into(),
            created_at,
            watermarks,
            policy,
            notify_target: notify_target.into(),
            state: LinkState::Active,
            capture_attempts: 0,
        }
    }

    /// When the link was first opened, if it has been.
    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            LinkState::Opened { opened_at } => Some(opened_at),
            _ => None,
        }
    }

    /// Whether the record is destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state == LinkState::Destroyed
    }

    /// Build the material handed to the display surface.
    pub fn render_payload(&self, remaining_seconds: Option<u32>) -> RenderPayload {
        RenderPayload {
            link_id: self.id.clone(),
            file_name: self.file_name.clone(),
            document: self.document.clone(),
            watermarks: self.watermarks.clone(),
            remaining_seconds,
        }
    }
}
