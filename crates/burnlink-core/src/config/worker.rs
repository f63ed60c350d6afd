//! Background expiry sweeper configuration.

use serde::{Deserialize, Serialize};

/// Expiry sweeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the sweeper runs alongside the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Number of links ticked concurrently during a sweep.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Hours a tombstone is kept before it is purged.
    #[serde(default = "default_tombstone_retention")]
    pub tombstone_retention_hours: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            sweep_interval_seconds: default_sweep_interval(),
            concurrency: default_concurrency(),
            tombstone_retention_hours: default_tombstone_retention(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    1
}

fn default_concurrency() -> usize {
    4
}

fn default_tombstone_retention() -> u64 {
    24 * 7
}
