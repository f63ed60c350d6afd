//! Notification sink trait for pluggable delivery transports.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Receives link events. Delivery is fire-and-forget from the caller's
/// point of view: an error is logged by the dispatcher and never changes
/// the outcome of the operation that produced the event.
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug + 'static {
    /// Short provider name for logs (`"log"`, `"webhook"`, ...).
    fn name(&self) -> &'static str;

    /// Deliver one event.
    async fn notify(&self, event: &DomainEvent) -> AppResult<()>;
}
