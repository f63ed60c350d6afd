//! Notification sink configuration.

use serde::{Deserialize, Serialize};

/// Where "document opened" and capture events are delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Sink provider: `"log"`, `"webhook"`, or `"none"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Endpoint receiving JSON events when `provider = "webhook"`.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Delivery timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            webhook_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_timeout() -> u64 {
    5
}
