//! Domain events emitted by BurnLink operations.
//!
//! Events are handed to the notification dispatcher, which forwards them
//! to the configured [`NotificationSink`](crate::traits::NotificationSink).

pub mod link;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::EventId;

pub use link::LinkEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: EventId,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: LinkEvent,
}

impl DomainEvent {
    /// Create a new domain event stamped at `timestamp`.
    pub fn new(payload: LinkEvent, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            timestamp,
            payload,
        }
    }
}
