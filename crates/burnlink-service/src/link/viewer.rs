//! Viewer operations: open, tick, capture reports.
//!
//! Each operation reads the record with its version, asks
//! [`LinkLifecycle`] for a decision, and persists the decision with a
//! compare-and-swap. Losing the swap means another caller moved the link
//! first, so the decision is recomputed from a fresh read.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use burnlink_core::config::AppConfig;
use burnlink_core::error::AppError;
use burnlink_core::events::LinkEvent;
use burnlink_core::result::AppResult;
use burnlink_core::types::id::LinkId;
use burnlink_database::{CasOutcome, LinkChange, LinkLookup, LinkStore, Versioned};
use burnlink_entity::{DestructionCause, LinkRecord, RenderPayload, Tombstone};

use crate::lifecycle::{
    CaptureOutcome, DenyReason, LinkLifecycle, OpenOutcome, TickOutcome, Transition,
};
use crate::notification::NotificationDispatcher;
use crate::timeout::bounded;

/// Result of a tick as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickResult {
    /// Seconds left before destruction.
    Remaining {
        /// Seconds left.
        seconds: u32,
    },
    /// The link has been destroyed.
    Expired,
    /// The link has not been opened yet.
    NotStarted,
}

/// Result of a capture report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaptureReport {
    /// Counted against a live link.
    Counted {
        /// Attempts recorded so far.
        attempts: u32,
    },
    /// The link was already consumed. The owner is notified without a count.
    Uncounted,
    /// The link has never been opened.
    NotOpened,
}

/// Resolves view requests against the link lifecycle.
#[derive(Debug, Clone)]
pub struct ViewerService {
    /// Link store.
    store: Arc<dyn LinkStore>,
    /// Notification dispatcher.
    notifier: Arc<NotificationDispatcher>,
    /// Upper bound on each store call.
    op_timeout: Duration,
    /// Decision recomputations allowed after lost races.
    max_retries: u32,
}

enum Resolved {
    Live(Versioned<LinkRecord>),
    Gone(AppError),
}

/// Viewer-facing error for a tombstone.
fn tombstone_error(tombstone: &Tombstone) -> AppError {
    match tombstone.cause {
        DestructionCause::Consumed => AppError::already_destroyed("Link has already been viewed"),
        DestructionCause::Expired | DestructionCause::Revoked => {
            AppError::not_found("Link not found")
        }
    }
}

impl ViewerService {
    /// Creates a new viewer service.
    pub fn new(
        store: Arc<dyn LinkStore>,
        notifier: Arc<NotificationDispatcher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            op_timeout: Duration::from_millis(config.database.operation_timeout_ms),
            max_retries: config.links.max_transition_retries,
        }
    }

    async fn lookup(&self, id: &LinkId) -> AppResult<LinkLookup> {
        bounded(self.op_timeout, "lookup", self.store.lookup(id)).await
    }

    async fn resolve(&self, id: &LinkId) -> AppResult<Resolved> {
        Ok(match self.lookup(id).await? {
            LinkLookup::Live(current) => Resolved::Live(current),
            LinkLookup::Destroyed(tombstone) => Resolved::Gone(tombstone_error(&tombstone)),
            LinkLookup::Unknown => Resolved::Gone(AppError::not_found("Link not found")),
        })
    }

    async fn swap(&self, id: &LinkId, version: u64, change: LinkChange) -> AppResult<CasOutcome> {
        bounded(
            self.op_timeout,
            "compare_and_swap",
            self.store.compare_and_swap(id, version, change),
        )
        .await
    }

    /// Persist `transition` against `version`. Returns `false` on a lost race.
    async fn apply(
        &self,
        id: &LinkId,
        version: u64,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        match transition {
            Transition::None => Ok(true),
            Transition::Update(record) => Ok(self
                .swap(id, version, LinkChange::Update(record))
                .await?
                .is_applied()),
            Transition::Destroy(cause) => Ok(self
                .swap(id, version, LinkChange::Destroy { cause, at: now })
                .await?
                .is_applied()),
            Transition::UpdateThenDestroy(record, cause) => {
                match self.swap(id, version, LinkChange::Update(record)).await? {
                    CasOutcome::Conflict => Ok(false),
                    CasOutcome::Applied { version } => {
                        self.finish_destroy(id, version, cause, now).await;
                        Ok(true)
                    }
                }
            }
        }
    }

    /// Destroy after a committed update. The update already decided the
    /// outcome, so a failure here is left for the sweeper.
    async fn finish_destroy(
        &self,
        id: &LinkId,
        version: u64,
        cause: DestructionCause,
        now: DateTime<Utc>,
    ) {
        match self
            .swap(id, version, LinkChange::Destroy { cause, at: now })
            .await
        {
            Ok(CasOutcome::Applied { .. }) => {
                debug!(link = %id.fingerprint(), %cause, "Link destroyed after view");
            }
            Ok(CasOutcome::Conflict) => {
                debug!(link = %id.fingerprint(), "Link moved on before destruction");
            }
            Err(e) => {
                warn!(
                    link = %id.fingerprint(),
                    %cause,
                    error = %e,
                    "Destruction after view failed; sweeper will retry"
                );
            }
        }
    }

    fn notify(&self, event: Option<LinkEvent>, now: DateTime<Utc>) {
        if let Some(event) = event {
            self.notifier.dispatch(event, now);
        }
    }

    fn exhausted(&self, id: &LinkId, operation: &str) -> AppError {
        warn!(link = %id.fingerprint(), operation, retries = self.max_retries, "Transition retries exhausted");
        AppError::conflict(format!(
            "Link kept changing during {operation}; try again"
        ))
    }

    /// Opens a link.
    ///
    /// Content is returned only after the open is durably recorded. Must not
    /// be retried automatically by callers: a single-view link would read a
    /// retry as a second view.
    pub async fn open_link(&self, id: &LinkId, now: DateTime<Utc>) -> AppResult<RenderPayload> {
        for _ in 0..=self.max_retries {
            let current = match self.resolve(id).await? {
                Resolved::Live(current) => current,
                Resolved::Gone(err) => {
                    debug!(link = %id.fingerprint(), kind = %err.kind, "Open denied");
                    return Err(err);
                }
            };

            let decision = LinkLifecycle::on_open(Some(&current.record), now);

            match decision.outcome {
                OpenOutcome::Granted(payload) => {
                    if !self.apply(id, current.version, decision.transition, now).await? {
                        continue;
                    }
                    info!(
                        link = %id.fingerprint(),
                        policy = current.record.policy.label(),
                        remaining_seconds = ?payload.remaining_seconds,
                        "Link opened"
                    );
                    self.notify(decision.event, now);
                    return Ok(payload);
                }
                OpenOutcome::Denied(reason) => {
                    // The denial stands whether or not the cleanup lands.
                    if let Err(e) = self.apply(id, current.version, decision.transition, now).await {
                        warn!(link = %id.fingerprint(), error = %e, "Cleanup after denied open failed");
                    }
                    debug!(link = %id.fingerprint(), ?reason, "Open denied");
                    return Err(match reason {
                        DenyReason::AlreadyDestroyed => {
                            AppError::already_destroyed("Link has already been viewed")
                        }
                        DenyReason::Expired => AppError::not_found("Link not found"),
                    });
                }
            }
        }

        Err(self.exhausted(id, "open"))
    }

    /// Re-evaluates a time-boxed link against the clock, destroying it once
    /// its window has closed. Safe to call from any number of pollers.
    pub async fn tick(&self, id: &LinkId, now: DateTime<Utc>) -> AppResult<TickResult> {
        for _ in 0..=self.max_retries {
            let current = match self.lookup(id).await? {
                LinkLookup::Live(current) => current,
                LinkLookup::Destroyed(_) | LinkLookup::Unknown => {
                    return Err(AppError::not_found("Link not found"));
                }
            };

            let decision = LinkLifecycle::on_tick(Some(&current.record), now);
            let result = match decision.outcome {
                TickOutcome::Remaining(seconds) => TickResult::Remaining { seconds },
                TickOutcome::Expired => TickResult::Expired,
                TickOutcome::NotStarted => TickResult::NotStarted,
                TickOutcome::NotFound => return Err(AppError::not_found("Link not found")),
            };

            if !self.apply(id, current.version, decision.transition, now).await? {
                continue;
            }
            if result == TickResult::Expired {
                info!(link = %id.fingerprint(), "Link expired");
            }
            return Ok(result);
        }

        Err(self.exhausted(id, "tick"))
    }

    /// Records a capture attempt reported by the display surface and
    /// forwards it to the notification path. Nothing is enforced.
    pub async fn report_capture_attempt(
        &self,
        id: &LinkId,
        now: DateTime<Utc>,
    ) -> AppResult<CaptureReport> {
        for _ in 0..=self.max_retries {
            let current = match self.lookup(id).await? {
                LinkLookup::Live(current) => current,
                LinkLookup::Destroyed(tombstone) if tombstone.cause == DestructionCause::Consumed => {
                    warn!(link = %id.fingerprint(), "Capture attempt on consumed link");
                    self.notify(
                        Some(LinkEvent::CaptureAttempted {
                            link_id: tombstone.id,
                            file_name: tombstone.file_name,
                            notify_target: tombstone.notify_target,
                            attempts: None,
                            at: now,
                        }),
                        now,
                    );
                    return Ok(CaptureReport::Uncounted);
                }
                LinkLookup::Destroyed(_) | LinkLookup::Unknown => {
                    return Err(AppError::not_found("Link not found"));
                }
            };

            let decision = LinkLifecycle::on_capture_attempt(Some(&current.record), now);
            let report = match decision.outcome {
                CaptureOutcome::Counted { attempts } => CaptureReport::Counted { attempts },
                CaptureOutcome::NotOpened => return Ok(CaptureReport::NotOpened),
                CaptureOutcome::NotFound => return Err(AppError::not_found("Link not found")),
            };

            if !self.apply(id, current.version, decision.transition, now).await? {
                continue;
            }
            warn!(link = %id.fingerprint(), ?report, "Capture attempt reported");
            self.notify(decision.event, now);
            return Ok(report);
        }

        Err(self.exhausted(id, "capture report"))
    }
}
