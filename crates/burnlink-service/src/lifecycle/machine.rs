//! The link state machine.

use chrono::{DateTime, Utc};

use burnlink_core::events::LinkEvent;
use burnlink_entity::{DestructionCause, DestructionPolicy, LinkRecord, LinkState};

use super::{CaptureOutcome, Decision, DenyReason, OpenOutcome, TickOutcome, Transition};

/// Stateless transition rules for a single link.
///
/// `Active -> Opened -> (destroyed)` for both policies. A time-boxed link
/// is destroyed by the first tick or open at or past its deadline; a
/// single-view link is destroyed right after its first open.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkLifecycle;

/// Whole seconds since `opened_at`, never negative.
fn elapsed_seconds(opened_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - opened_at).num_seconds().max(0) as u64
}

/// Seconds left of a `seconds`-long window opened at `opened_at`, or
/// `None` once the window has closed.
fn window_left(seconds: u32, opened_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<u32> {
    let elapsed = elapsed_seconds(opened_at, now);
    (elapsed < u64::from(seconds)).then(|| seconds - elapsed as u32)
}

fn opened_event(record: &LinkRecord, opened_at: DateTime<Utc>, first_view: bool) -> LinkEvent {
    LinkEvent::Opened {
        link_id: record.id.clone(),
        file_name: record.file_name.clone(),
        notify_target: record.notify_target.clone(),
        opened_at,
        first_view,
    }
}

impl LinkLifecycle {
    /// Decide an open request.
    pub fn on_open(record: Option<&LinkRecord>, now: DateTime<Utc>) -> Decision<OpenOutcome> {
        let Some(record) = record else {
            return Decision::only(OpenOutcome::Denied(DenyReason::AlreadyDestroyed));
        };

        match (record.state, record.policy) {
            (LinkState::Destroyed, _) => {
                Decision::only(OpenOutcome::Denied(DenyReason::AlreadyDestroyed))
            }
            (LinkState::Active, policy) => {
                let mut opened = record.clone();
                opened.state = LinkState::Opened { opened_at: now };
                let payload = opened.render_payload(policy.duration_seconds());
                let transition = match policy {
                    DestructionPolicy::AfterFirstView => {
                        Transition::UpdateThenDestroy(opened, DestructionCause::Consumed)
                    }
                    DestructionPolicy::AfterDuration { .. } => Transition::Update(opened),
                };
                Decision {
                    outcome: OpenOutcome::Granted(payload),
                    transition,
                    event: Some(opened_event(record, now, true)),
                }
            }
            (LinkState::Opened { .. }, DestructionPolicy::AfterFirstView) => {
                // Opened but still stored: the destroy after the first view
                // did not land. Finish it.
                Decision::with(
                    OpenOutcome::Denied(DenyReason::AlreadyDestroyed),
                    Transition::Destroy(DestructionCause::Consumed),
                )
            }
            (LinkState::Opened { opened_at }, DestructionPolicy::AfterDuration { seconds }) => {
                match window_left(seconds, opened_at, now) {
                    Some(left) => Decision {
                        outcome: OpenOutcome::Granted(record.render_payload(Some(left))),
                        transition: Transition::None,
                        event: Some(opened_event(record, opened_at, false)),
                    },
                    None => Decision::with(
                        OpenOutcome::Denied(DenyReason::Expired),
                        Transition::Destroy(DestructionCause::Expired),
                    ),
                }
            }
        }
    }

    /// Re-evaluate a record against the clock.
    pub fn on_tick(record: Option<&LinkRecord>, now: DateTime<Utc>) -> Decision<TickOutcome> {
        let Some(record) = record else {
            return Decision::only(TickOutcome::NotFound);
        };

        match (record.state, record.policy) {
            (LinkState::Destroyed, _) => Decision::only(TickOutcome::NotFound),
            (LinkState::Active, _) => Decision::only(TickOutcome::NotStarted),
            (LinkState::Opened { .. }, DestructionPolicy::AfterFirstView) => Decision::with(
                TickOutcome::Expired,
                Transition::Destroy(DestructionCause::Consumed),
            ),
            (LinkState::Opened { opened_at }, DestructionPolicy::AfterDuration { seconds }) => {
                match window_left(seconds, opened_at, now) {
                    Some(left) => Decision::only(TickOutcome::Remaining(left)),
                    None => Decision::with(
                        TickOutcome::Expired,
                        Transition::Destroy(DestructionCause::Expired),
                    ),
                }
            }
        }
    }

    /// Count a capture attempt reported by the display surface.
    pub fn on_capture_attempt(
        record: Option<&LinkRecord>,
        now: DateTime<Utc>,
    ) -> Decision<CaptureOutcome> {
        let Some(record) = record else {
            return Decision::only(CaptureOutcome::NotFound);
        };

        match record.state {
            LinkState::Destroyed => Decision::only(CaptureOutcome::NotFound),
            LinkState::Active => Decision::only(CaptureOutcome::NotOpened),
            LinkState::Opened { .. } => {
                let mut updated = record.clone();
                updated.capture_attempts = updated.capture_attempts.saturating_add(1);
                let attempts = updated.capture_attempts;
                Decision {
                    outcome: CaptureOutcome::Counted { attempts },
                    transition: Transition::Update(updated),
                    event: Some(LinkEvent::CaptureAttempted {
                        link_id: record.id.clone(),
                        file_name: record.file_name.clone(),
                        notify_target: record.notify_target.clone(),
                        attempts: Some(attempts),
                        at: now,
                    }),
                }
            }
        }
    }

    /// Seconds left before a time-boxed link is destroyed.
    ///
    /// Computed from `now - opened_at` alone, so any process can recompute
    /// it after a restart. `None` for single-view links and closed windows;
    /// the full duration while the link is still unopened.
    pub fn remaining_seconds(record: &LinkRecord, now: DateTime<Utc>) -> Option<u32> {
        match (record.state, record.policy) {
            (LinkState::Active, DestructionPolicy::AfterDuration { seconds }) => Some(seconds),
            (LinkState::Opened { opened_at }, DestructionPolicy::AfterDuration { seconds }) => {
                window_left(seconds, opened_at, now)
            }
            _ => None,
        }
    }
}
