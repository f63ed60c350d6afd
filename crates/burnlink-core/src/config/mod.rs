//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a serde default so a partial file is valid.

pub mod app;
pub mod database;
pub mod links;
pub mod logging;
pub mod notification;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::links::LinksConfig;
pub use self::logging::LoggingConfig;
pub use self::notification::NotificationConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides, e.g. `BURNLINK__SERVER__PORT`.
pub const ENV_PREFIX: &str = "BURNLINK";

/// Keys whose environment values are comma-separated lists.
const ENV_LIST_KEYS: [&str; 2] = ["links.allowed_durations_seconds", "links.accepted_media_types"];

/// Longest tombstone retention accepted, in hours (ten years).
pub const MAX_TOMBSTONE_RETENTION_HOURS: u64 = 24 * 365 * 10;

/// Environment source for `BURNLINK__` overrides.
fn environment() -> config::Environment {
    ENV_LIST_KEYS.iter().fold(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Link store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Link creation and lifecycle rules.
    #[serde(default)]
    pub links: LinksConfig,
    /// Notification sink settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Expiry sweeper settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; values are then overridden by environment
    /// variables prefixed with `BURNLINK__`, using `__` between sections.
    /// List-valued keys such as `links.allowed_durations_seconds` take
    /// comma-separated values.
    pub fn load(path: &str) -> Result<Self, AppError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: &str, env: config::Environment) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Parse configuration from an in-memory TOML string.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject settings that cannot work at runtime.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.database.provider.as_str() {
            "sqlite" | "memory" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider '{other}'"
                )));
            }
        }

        match self.notifications.provider.as_str() {
            "log" | "none" => {}
            "webhook" if self.notifications.webhook_url.is_some() => {}
            "webhook" => {
                return Err(AppError::configuration(
                    "notifications.webhook_url is required for the webhook provider",
                ));
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown notification provider '{other}'"
                )));
            }
        }

        if self
            .links
            .allowed_durations_seconds
            .iter()
            .any(|s| *s == 0 || *s > self.links.max_duration_seconds)
        {
            return Err(AppError::configuration(
                "links.allowed_durations_seconds must be positive and within max_duration_seconds",
            ));
        }

        if self.worker.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "worker.sweep_interval_seconds must be positive",
            ));
        }

        if self.worker.tombstone_retention_hours > MAX_TOMBSTONE_RETENTION_HOURS {
            return Err(AppError::configuration(format!(
                "worker.tombstone_retention_hours must be at most {MAX_TOMBSTONE_RETENTION_HOURS}"
            )));
        }

        Ok(())
    }

    /// Shareable URL for a link token.
    pub fn link_url(&self, link_id: &str) -> String {
        format!(
            "{}/view?id={}",
            self.server.base_url.trim_end_matches('/'),
            link_id
        )
    }
}
