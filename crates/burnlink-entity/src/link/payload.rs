//! Render payload handed to the display surface.

use serde::{Deserialize, Serialize};

use burnlink_core::types::id::LinkId;

use super::document::Document;
use super::watermark::WatermarkPlacement;

/// Everything the display surface needs to render one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    /// The link being viewed.
    pub link_id: LinkId,
    /// Display name of the document.
    pub file_name: String,
    /// The protected document.
    pub document: Document,
    /// Watermark overlay, in editor order.
    pub watermarks: Vec<WatermarkPlacement>,
    /// Seconds until destruction for time-boxed links.
    pub remaining_seconds: Option<u32>,
}
