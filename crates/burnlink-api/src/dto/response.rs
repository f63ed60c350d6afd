//! Response DTOs.

use serde::{Deserialize, Serialize};

use burnlink_core::types::id::LinkId;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Link store backend.
    pub store: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Revoke response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLinkResponse {
    /// Link token.
    pub id: LinkId,
    /// Whether a live link was removed by this call.
    pub removed: bool,
}
