//! Fire-and-forget event delivery.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use burnlink_core::error::ErrorKind;
use burnlink_core::events::{DomainEvent, LinkEvent};
use burnlink_core::traits::NotificationSink;

/// Hands events to a sink on a background task.
///
/// Delivery never blocks or fails the operation that produced the event.
/// Errors and timeouts are logged as `NotificationFailure`.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
}

impl NotificationDispatcher {
    /// Create a dispatcher delivering to `sink`, abandoning each delivery
    /// after `timeout`.
    pub fn new(sink: Arc<dyn NotificationSink>, timeout: Duration) -> Self {
        Self { sink, timeout }
    }

    /// Name of the underlying sink.
    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Spawn delivery of `event`. The returned handle may be dropped.
    pub fn dispatch(&self, event: LinkEvent, at: DateTime<Utc>) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let timeout = self.timeout;
        let event = DomainEvent::new(event, at);

        tokio::spawn(async move {
            let link = event.payload.link_id().fingerprint().to_string();
            match tokio::time::timeout(timeout, sink.notify(&event)).await {
                Ok(Ok(())) => {
                    debug!(sink = sink.name(), event = event.payload.name(), link = %link, "Notification delivered");
                }
                Ok(Err(e)) => {
                    warn!(
                        sink = sink.name(),
                        kind = %ErrorKind::NotificationFailure,
                        event = event.payload.name(),
                        link = %link,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
                Err(_) => {
                    warn!(
                        sink = sink.name(),
                        kind = %ErrorKind::NotificationFailure,
                        event = event.payload.name(),
                        link = %link,
                        timeout_ms = timeout.as_millis() as u64,
                        "Notification delivery timed out"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use burnlink_core::error::AppError;
    use burnlink_core::result::AppResult;

    use super::*;

    #[derive(Debug, Default)]
    struct FlakySink {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl NotificationSink for FlakySink {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn notify(&self, _event: &DomainEvent) -> AppResult<()> {
            *self.calls.lock().await += 1;
            Err(AppError::notification("transport down"))
        }
    }

    #[derive(Debug)]
    struct StuckSink;

    #[async_trait]
    impl NotificationSink for StuckSink {
        fn name(&self) -> &'static str {
            "stuck"
        }

        async fn notify(&self, _event: &DomainEvent) -> AppResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn event() -> LinkEvent {
        LinkEvent::Opened {
            link_id: "abcdefghij".parse().unwrap(),
            file_name: "memo.pdf".to_string(),
            notify_target: "owner@example.com".to_string(),
            opened_at: Utc::now(),
            first_view: true,
        }
    }

    #[tokio::test]
    async fn test_failed_delivery_is_contained() {
        let sink = Arc::new(FlakySink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone(), Duration::from_secs(1));

        dispatcher.dispatch(event(), Utc::now()).await.unwrap();
        assert_eq!(*sink.calls.lock().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_delivery_is_abandoned() {
        let dispatcher = NotificationDispatcher::new(Arc::new(StuckSink), Duration::from_secs(5));
        dispatcher.dispatch(event(), Utc::now()).await.unwrap();
    }
}
