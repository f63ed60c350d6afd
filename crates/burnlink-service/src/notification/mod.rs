//! Notification delivery: sinks and the fire-and-forget dispatcher.

pub mod dispatcher;
pub mod sink;

pub use dispatcher::NotificationDispatcher;
pub use sink::{LogSink, NoopSink, WebhookSink, build_sink};
