//! Core traits defined in `burnlink-core` and implemented by other crates.

pub mod notifier;

pub use notifier::NotificationSink;
