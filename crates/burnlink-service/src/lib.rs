//! # burnlink-service
//!
//! Business logic for BurnLink. [`LinkLifecycle`] decides every state
//! transition without touching storage; the services apply those decisions
//! through the [`LinkStore`](burnlink_database::LinkStore) compare-and-swap.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod lifecycle;
pub mod link;
pub mod notification;
pub mod timeout;

pub use lifecycle::{
    CaptureOutcome, Decision, DenyReason, LinkLifecycle, OpenOutcome, TickOutcome, Transition,
};
pub use link::{AdminService, CaptureReport, LinkService, NewLink, TickResult, ViewerService};
pub use notification::{LogSink, NoopSink, NotificationDispatcher, WebhookSink, build_sink};
pub use timeout::bounded;
