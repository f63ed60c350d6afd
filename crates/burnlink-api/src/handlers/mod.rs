//! Request handlers organized by surface.

pub mod health;
pub mod link;
pub mod view;

use burnlink_core::error::{AppError, ErrorKind};
use burnlink_core::types::id::LinkId;

/// Parses a link token from a path or query value.
///
/// A malformed token cannot name a link, so it is reported as unknown.
pub fn parse_link_id(raw: &str) -> Result<LinkId, AppError> {
    raw.parse::<LinkId>()
        .map_err(|e| AppError::with_source(ErrorKind::NotFound, "Link not found", e))
}
