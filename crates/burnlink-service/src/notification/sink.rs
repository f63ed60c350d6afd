//! Notification sink implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use burnlink_core::config::NotificationConfig;
use burnlink_core::error::{AppError, ErrorKind};
use burnlink_core::events::DomainEvent;
use burnlink_core::result::AppResult;
use burnlink_core::traits::NotificationSink;

/// Writes each event as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        info!(
            event_id = %event.id,
            event = event.payload.name(),
            link = %event.payload.link_id().fingerprint(),
            notify_target = %event.payload.notify_target(),
            "Link notification"
        );
        Ok(())
    }
}

/// Drops every event.
#[derive(Debug, Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn notify(&self, _event: &DomainEvent) -> AppResult<()> {
        Ok(())
    }
}

/// POSTs each event as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a sink posting to `url`, giving up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build webhook client: {e}"),
                    e,
                )
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        self.client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::NotificationFailure,
                    format!("Webhook delivery failed: {e}"),
                    e,
                )
            })?;
        Ok(())
    }
}

/// Build the sink selected by `notifications.provider`.
pub fn build_sink(config: &NotificationConfig) -> AppResult<Arc<dyn NotificationSink>> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogSink)),
        "none" => Ok(Arc::new(NoopSink)),
        "webhook" => {
            let url = config.webhook_url.as_deref().ok_or_else(|| {
                AppError::configuration("notifications.webhook_url is required for webhooks")
            })?;
            Ok(Arc::new(WebhookSink::new(
                url,
                Duration::from_secs(config.timeout_seconds),
            )?))
        }
        other => Err(AppError::configuration(format!(
            "Unknown notification provider '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sink_by_provider() {
        let mut config = NotificationConfig::default();
        assert_eq!(build_sink(&config).unwrap().name(), "log");

        config.provider = "none".to_string();
        assert_eq!(build_sink(&config).unwrap().name(), "none");

        config.provider = "webhook".to_string();
        assert!(build_sink(&config).is_err());
        config.webhook_url = Some("http://127.0.0.1:9/hook".to_string());
        assert_eq!(build_sink(&config).unwrap().name(), "webhook");

        config.provider = "carrier-pigeon".to_string();
        assert!(build_sink(&config).is_err());
    }
}
