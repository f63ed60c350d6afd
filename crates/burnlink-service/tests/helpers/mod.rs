//! Shared helpers for service tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use burnlink_core::config::{AppConfig, DatabaseConfig};
use burnlink_core::events::DomainEvent;
use burnlink_core::result::AppResult;
use burnlink_core::traits::NotificationSink;
use burnlink_database::{LinkStore, MemoryLinkStore};
use burnlink_entity::{DestructionPolicy, Document, NewWatermark};
use burnlink_service::{AdminService, LinkService, NewLink, NotificationDispatcher, ViewerService};

/// Base instant for scenario clocks.
pub fn t(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap() + chrono::Duration::seconds(seconds)
}

/// Sink that keeps every delivered event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    /// Wait until at least `count` events arrived, then return them all.
    pub async fn wait_for(&self, count: usize) -> Vec<DomainEvent> {
        for _ in 0..200 {
            {
                let events = self.events.lock().await;
                if events.len() >= count {
                    return events.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {count} notification(s)");
    }

    /// Events delivered so far.
    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Services wired over one store.
pub struct Harness {
    pub store: Arc<dyn LinkStore>,
    pub admin: AdminService,
    pub viewer: ViewerService,
    pub sink: Arc<RecordingSink>,
    pub config: Arc<AppConfig>,
}

impl Harness {
    /// Wire services over `store` with default configuration.
    pub fn with_store(store: Arc<dyn LinkStore>) -> Self {
        Self::with_store_and_config(store, AppConfig::default())
    }

    /// Wire services over `store` with `config`.
    pub fn with_store_and_config(store: Arc<dyn LinkStore>, config: AppConfig) -> Self {
        let config = Arc::new(config);
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            sink.clone(),
            Duration::from_secs(1),
        ));
        let admin = AdminService::new(
            Arc::clone(&store),
            Arc::new(LinkService::new(config.links.token_bytes)),
            Arc::clone(&config),
        );
        let viewer = ViewerService::new(Arc::clone(&store), dispatcher, &config);
        Self {
            store,
            admin,
            viewer,
            sink,
            config,
        }
    }

    /// In-memory harness.
    pub fn memory() -> Self {
        Self::with_store(Arc::new(MemoryLinkStore::new()))
    }

    /// SQLite harness on a file inside `dir`.
    pub async fn sqlite(dir: &Path) -> Self {
        let config = DatabaseConfig {
            provider: "sqlite".to_string(),
            url: format!("sqlite://{}", dir.join("links.db").display()),
            ..DatabaseConfig::default()
        };
        let store = burnlink_database::open_store(&config)
            .await
            .expect("sqlite store should open");
        Self::with_store(store)
    }
}

/// A valid creation request.
pub fn new_link(policy: DestructionPolicy) -> NewLink {
    NewLink {
        document: Document::new("application/pdf", b"%PDF-1.7 board minutes".to_vec()),
        file_name: "board-minutes.pdf".to_string(),
        watermarks: vec![NewWatermark::at(50.0, 50.0)],
        policy,
        notify_target: "owner@example.com".to_string(),
    }
}
