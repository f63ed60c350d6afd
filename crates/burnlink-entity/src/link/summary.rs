//! Administrator listing projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use burnlink_core::types::id::LinkId;

use super::model::{LinkRecord, LinkState};
use super::policy::DestructionPolicy;

/// A live record without its document bytes.
///
/// Stores keep this alongside each record so listings never load or decode
/// documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkOverview {
    /// Link token.
    pub id: LinkId,
    /// Display name of the document.
    pub file_name: String,
    /// Document media type.
    pub media_type: String,
    /// Document size in bytes.
    pub document_bytes: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Destruction policy.
    pub policy: DestructionPolicy,
    /// Lifecycle state.
    pub state: LinkState,
    /// Number of watermark placements.
    pub watermark_count: usize,
    /// Capture attempts reported so far.
    pub capture_attempts: u32,
}

impl From<&LinkRecord> for LinkOverview {
    fn from(record: &LinkRecord) -> Self {
        Self {
            id: record.id.clone(),
            file_name: record.file_name.clone(),
            media_type: record.document.media_type.clone(),
            document_bytes: record.document.len(),
            created_at: record.created_at,
            policy: record.policy,
            state: record.state,
            watermark_count: record.watermarks.len(),
            capture_attempts: record.capture_attempts,
        }
    }
}

/// Read-only view of a link for the administrator. Never carries the
/// document bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSummary {
    /// Link token.
    pub id: LinkId,
    /// Shareable URL.
    pub url: String,
    /// Display name of the document.
    pub file_name: String,
    /// Document media type.
    pub media_type: String,
    /// Document size in bytes.
    pub document_bytes: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Destruction policy.
    pub policy: DestructionPolicy,
    /// Human-readable policy.
    pub policy_summary: String,
    /// Lifecycle state.
    pub state: LinkState,
    /// Number of watermark placements.
    pub watermark_count: usize,
    /// Capture attempts reported so far.
    pub capture_attempts: u32,
}

impl LinkSummary {
    /// Project a record, attaching its shareable URL.
    pub fn from_record(record: &LinkRecord, url: String) -> Self {
        Self::from_overview(LinkOverview::from(record), url)
    }

    /// Attach a shareable URL to a stored overview.
    pub fn from_overview(overview: LinkOverview, url: String) -> Self {
        Self {
            id: overview.id,
            url,
            file_name: overview.file_name,
            media_type: overview.media_type,
            document_bytes: overview.document_bytes,
            created_at: overview.created_at,
            policy_summary: overview.policy.summary(),
            policy: overview.policy,
            state: overview.state,
            watermark_count: overview.watermark_count,
            capture_attempts: overview.capture_attempts,
        }
    }
}
