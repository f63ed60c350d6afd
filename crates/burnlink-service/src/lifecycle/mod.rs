//! Pure link state transitions.
//!
//! Nothing here reads a clock or a store. A caller passes the current
//! record and time, gets back a [`Decision`], and is responsible for
//! persisting its [`Transition`] atomically before acting on the outcome.

mod machine;

pub use machine::LinkLifecycle;

use burnlink_core::events::LinkEvent;
use burnlink_entity::{DestructionCause, LinkRecord, RenderPayload};

/// The store write a decision requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing to persist.
    None,
    /// Replace the record.
    Update(LinkRecord),
    /// Destroy the record.
    Destroy(DestructionCause),
    /// Replace the record, then destroy it. The update is the commit point;
    /// destruction follows once the outcome has been produced.
    UpdateThenDestroy(LinkRecord, DestructionCause),
}

/// An outcome plus what must be persisted and announced to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<O> {
    /// What to report to the caller.
    pub outcome: O,
    /// Store write backing the outcome.
    pub transition: Transition,
    /// Event to forward once the transition is persisted.
    pub event: Option<LinkEvent>,
}

impl<O> Decision<O> {
    fn only(outcome: O) -> Self {
        Self {
            outcome,
            transition: Transition::None,
            event: None,
        }
    }

    fn with(outcome: O, transition: Transition) -> Self {
        Self {
            outcome,
            transition,
            event: None,
        }
    }
}

/// Why an open was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The record is gone or its single view was already used.
    AlreadyDestroyed,
    /// The countdown ran out before this open.
    Expired,
}

/// Result of an open request.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// Render this content.
    Granted(RenderPayload),
    /// Render nothing.
    Denied(DenyReason),
}

/// Result of a countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds left before destruction.
    Remaining(u32),
    /// The link is now destroyed.
    Expired,
    /// The link has not been opened, so no countdown is running.
    NotStarted,
    /// No such link.
    NotFound,
}

/// Result of a reported capture attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The attempt was counted; `attempts` is the new total.
    Counted {
        /// Attempts recorded so far.
        attempts: u32,
    },
    /// The link has never been opened, so nothing could be captured.
    NotOpened,
    /// No such link.
    NotFound,
}
