//! Expiry sweeper: periodic ticks and tombstone purging.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use burnlink_core::config::{AppConfig, WorkerConfig};
use burnlink_core::result::AppResult;
use burnlink_database::LinkStore;
use burnlink_service::{TickResult, ViewerService, bounded};

/// Counters from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Opened links ticked.
    pub ticked: u64,
    /// Links destroyed by this sweep.
    pub expired: u64,
    /// Ticks that failed and will be retried next sweep.
    pub failed: u64,
    /// Tombstones purged.
    pub purged: u64,
}

/// Periodically re-evaluates opened links against the clock.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Link store, for listing and purging.
    store: Arc<dyn LinkStore>,
    /// Viewer service, which owns the tick transition.
    viewer: Arc<ViewerService>,
    /// Sweeper configuration.
    config: WorkerConfig,
    /// Deadline for each store call the sweeper makes directly.
    op_timeout: Duration,
}

impl ExpirySweeper {
    /// Create a new sweeper.
    pub fn new(store: Arc<dyn LinkStore>, viewer: Arc<ViewerService>, config: &AppConfig) -> Self {
        Self {
            store,
            viewer,
            config: config.worker.clone(),
            op_timeout: Duration::from_millis(config.database.operation_timeout_ms),
        }
    }

    /// Tombstones destroyed before this instant are purged at `now`.
    fn purge_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        i64::try_from(self.config.tombstone_retention_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .and_then(|retention| now.checked_sub_signed(retention))
    }

    /// Run one sweep at `now`.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let opened = bounded(self.op_timeout, "list_opened", self.store.list_opened()).await?;
        let ticked = opened.len() as u64;

        let expired = AtomicU64::new(0);
        let failed = AtomicU64::new(0);

        stream::iter(opened)
            .for_each_concurrent(self.config.concurrency.max(1), |link| {
                let expired = &expired;
                let failed = &failed;
                async move {
                    match self.viewer.tick(&link.id, now).await {
                        Ok(TickResult::Expired) => {
                            expired.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(_) => {}
                        // Destroyed by a viewer since the listing.
                        Err(e) if e.is_link_gone() => {}
                        Err(e) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                            warn!(link = %link.id.fingerprint(), error = %e, "Sweep tick failed");
                        }
                    }
                }
            })
            .await;

        let purged = match self.purge_cutoff(now) {
            Some(cutoff) => {
                bounded(
                    self.op_timeout,
                    "purge_tombstones",
                    self.store.purge_tombstones(cutoff),
                )
                .await?
            }
            None => 0,
        };

        let report = SweepReport {
            ticked,
            expired: expired.into_inner(),
            failed: failed.into_inner(),
            purged,
        };

        if report.expired > 0 || report.purged > 0 || report.failed > 0 {
            info!(
                ticked = report.ticked,
                expired = report.expired,
                failed = report.failed,
                purged = report.purged,
                "Sweep completed"
            );
        } else {
            debug!(ticked = report.ticked, "Sweep completed");
        }

        Ok(report)
    }

    /// Sweep every `sweep_interval_seconds` until the cancel signal is set.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            backend = self.store.backend(),
            interval_seconds = self.config.sweep_interval_seconds,
            concurrency = self.config.concurrency,
            "Expiry sweeper started"
        );

        let mut interval = time::interval(Duration::from_secs(
            self.config.sweep_interval_seconds.max(1),
        ));
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    // A dropped sender also means shutdown.
                    if changed.is_err() || *cancel.borrow() {
                        info!("Expiry sweeper received shutdown signal");
                        break;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep_once(Utc::now()).await {
                        error!(error = %e, "Sweep failed; retrying next interval");
                    }
                }
            }
        }

        info!("Expiry sweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use burnlink_core::error::ErrorKind;
    use burnlink_core::types::id::LinkId;
    use burnlink_database::{
        CasOutcome, LinkChange, LinkLookup, MemoryLinkStore, OpenedLink,
    };
    use burnlink_entity::{
        DestructionCause, DestructionPolicy, Document, LinkOverview, LinkRecord, NewWatermark,
    };
    use burnlink_service::{
        AdminService, LinkService, NewLink, NoopSink, NotificationDispatcher,
    };

    use super::*;

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0).unwrap() + chrono::Duration::seconds(seconds)
    }

    struct Fixture {
        store: Arc<dyn LinkStore>,
        admin: AdminService,
        viewer: Arc<ViewerService>,
        sweeper: ExpirySweeper,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryLinkStore::new()), AppConfig::default())
    }

    fn fixture_with(store: Arc<dyn LinkStore>, config: AppConfig) -> Fixture {
        let config = Arc::new(config);
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(NoopSink),
            StdDuration::from_secs(1),
        ));
        let viewer = Arc::new(ViewerService::new(Arc::clone(&store), dispatcher, &config));
        let admin = AdminService::new(
            Arc::clone(&store),
            Arc::new(LinkService::default()),
            Arc::clone(&config),
        );
        let sweeper = ExpirySweeper::new(Arc::clone(&store), Arc::clone(&viewer), &config);
        Fixture {
            store,
            admin,
            viewer,
            sweeper,
        }
    }

    fn request(policy: DestructionPolicy) -> NewLink {
        NewLink {
            document: Document::new("application/pdf", b"%PDF".to_vec()),
            file_name: "plan.pdf".to_string(),
            watermarks: vec![NewWatermark::at(25.0, 75.0)],
            policy,
            notify_target: "owner@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sweep_expires_only_closed_windows() {
        let f = fixture();
        let short = f
            .admin
            .create_link(request(DestructionPolicy::AfterDuration { seconds: 10 }), t(0))
            .await
            .unwrap();
        let long = f
            .admin
            .create_link(request(DestructionPolicy::AfterDuration { seconds: 600 }), t(0))
            .await
            .unwrap();
        let unopened = f
            .admin
            .create_link(request(DestructionPolicy::AfterDuration { seconds: 10 }), t(0))
            .await
            .unwrap();
        f.viewer.open_link(&short.id, t(0)).await.unwrap();
        f.viewer.open_link(&long.id, t(0)).await.unwrap();

        let report = f.sweeper.sweep_once(t(30)).await.unwrap();
        assert_eq!(report.ticked, 2);
        assert_eq!(report.expired, 1);
        assert_eq!(report.failed, 0);

        assert!(f.store.get(&short.id).await.unwrap().is_none());
        assert!(f.store.get(&long.id).await.unwrap().is_some());
        assert!(f.store.get(&unopened.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_purges_old_tombstones() {
        let f = fixture();
        let record = f
            .admin
            .create_link(request(DestructionPolicy::AfterFirstView), t(0))
            .await
            .unwrap();
        f.viewer.open_link(&record.id, t(1)).await.unwrap();

        let report = f.sweeper.sweep_once(t(60)).await.unwrap();
        assert_eq!(report.purged, 0);
        assert!(matches!(
            f.store.lookup(&record.id).await.unwrap(),
            LinkLookup::Destroyed(_)
        ));

        let report = f.sweeper.sweep_once(t(169 * 3600)).await.unwrap();
        assert_eq!(report.purged, 1);
        assert_eq!(f.store.lookup(&record.id).await.unwrap(), LinkLookup::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_cancel() {
        let f = fixture();
        let (tx, rx) = watch::channel(false);
        let sweeper = Arc::new(f.sweeper);
        let handle = tokio::spawn({
            let sweeper = Arc::clone(&sweeper);
            async move { sweeper.run(rx).await }
        });

        time::sleep(StdDuration::from_secs(3)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    /// Store whose sweeper-facing calls can be made to hang.
    #[derive(Debug, Default)]
    struct HungStore {
        inner: MemoryLinkStore,
        hang_listing: bool,
        hang_purge: bool,
    }

    #[async_trait]
    impl LinkStore for HungStore {
        fn backend(&self) -> &'static str {
            "hung"
        }

        async fn put(&self, record: &LinkRecord) -> AppResult<u64> {
            self.inner.put(record).await
        }

        async fn lookup(&self, id: &LinkId) -> AppResult<LinkLookup> {
            self.inner.lookup(id).await
        }

        async fn compare_and_swap(
            &self,
            id: &LinkId,
            expected_version: u64,
            change: LinkChange,
        ) -> AppResult<CasOutcome> {
            self.inner.compare_and_swap(id, expected_version, change).await
        }

        async fn delete(
            &self,
            id: &LinkId,
            cause: DestructionCause,
            at: DateTime<Utc>,
        ) -> AppResult<bool> {
            self.inner.delete(id, cause, at).await
        }

        async fn list(&self) -> AppResult<Vec<LinkRecord>> {
            self.inner.list().await
        }

        async fn list_overviews(&self) -> AppResult<Vec<LinkOverview>> {
            self.inner.list_overviews().await
        }

        async fn list_opened(&self) -> AppResult<Vec<OpenedLink>> {
            if self.hang_listing {
                std::future::pending::<()>().await;
            }
            self.inner.list_opened().await
        }

        async fn purge_tombstones(&self, older_than: DateTime<Utc>) -> AppResult<u64> {
            if self.hang_purge {
                std::future::pending::<()>().await;
            }
            self.inner.purge_tombstones(older_than).await
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_listing_times_out() {
        let mut config = AppConfig::default();
        config.database.operation_timeout_ms = 250;
        let store = Arc::new(HungStore {
            hang_listing: true,
            ..HungStore::default()
        });
        let f = fixture_with(store, config);

        let err = f.sweeper.sweep_once(t(0)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_purge_times_out() {
        let mut config = AppConfig::default();
        config.database.operation_timeout_ms = 250;
        let store = Arc::new(HungStore {
            hang_purge: true,
            ..HungStore::default()
        });
        let f = fixture_with(store, config);

        let err = f.sweeper.sweep_once(t(0)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_oversized_retention_purges_nothing() {
        let mut config = AppConfig::default();
        config.worker.tombstone_retention_hours = u64::MAX;
        let f = fixture_with(Arc::new(MemoryLinkStore::new()), config);
        let record = f
            .admin
            .create_link(request(DestructionPolicy::AfterFirstView), t(0))
            .await
            .unwrap();
        f.admin.delete_link(&record.id, t(1)).await.unwrap();

        let report = f.sweeper.sweep_once(t(10 * 365 * 86_400)).await.unwrap();
        assert_eq!(report.purged, 0);
        assert!(matches!(
            f.store.lookup(&record.id).await.unwrap(),
            LinkLookup::Destroyed(_)
        ));
    }
}
