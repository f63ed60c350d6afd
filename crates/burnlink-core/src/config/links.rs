//! Link creation and lifecycle policy configuration.

use serde::{Deserialize, Serialize};

use crate::types::id::DEFAULT_TOKEN_BYTES;

/// Rules applied when links are created and transitioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Random bytes per link token (never fewer than 20).
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Destruction delays offered to administrators. Empty allows any
    /// positive delay up to `max_duration_seconds`.
    #[serde(default = "default_allowed_durations")]
    pub allowed_durations_seconds: Vec<u32>,
    /// Longest destruction delay accepted.
    #[serde(default = "default_max_duration")]
    pub max_duration_seconds: u32,
    /// Largest document accepted, in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Accepted document media types.
    #[serde(default = "default_media_types")]
    pub accepted_media_types: Vec<String>,
    /// How many times a transition is recomputed after losing a race.
    #[serde(default = "default_max_transition_retries")]
    pub max_transition_retries: u32,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            token_bytes: default_token_bytes(),
            allowed_durations_seconds: default_allowed_durations(),
            max_duration_seconds: default_max_duration(),
            max_document_bytes: default_max_document_bytes(),
            accepted_media_types: default_media_types(),
            max_transition_retries: default_max_transition_retries(),
        }
    }
}

fn default_token_bytes() -> usize {
    DEFAULT_TOKEN_BYTES
}

fn default_allowed_durations() -> Vec<u32> {
    vec![10, 60, 300, 600, 900, 1200]
}

fn default_max_duration() -> u32 {
    86_400
}

fn default_max_document_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_media_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

fn default_max_transition_retries() -> u32 {
    8
}
