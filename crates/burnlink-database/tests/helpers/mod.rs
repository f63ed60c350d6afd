//! Shared helpers for link store tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use burnlink_core::config::DatabaseConfig;
use burnlink_core::types::id::LinkId;
use burnlink_database::{LinkStore, MemoryLinkStore};
use burnlink_entity::{DestructionPolicy, Document, LinkRecord, NewWatermark};

/// A fixed point in time so ordering assertions are stable.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// A fresh record with one centered watermark.
pub fn sample_record(policy: DestructionPolicy, created_at: DateTime<Utc>) -> LinkRecord {
    LinkRecord::new(
        LinkId::generate(32),
        Document::new("application/pdf", b"%PDF-1.7 test document".to_vec()),
        "quarterly.pdf",
        vec![
            NewWatermark::at(50.0, 50.0).into_placement(),
            NewWatermark::at(12.5, 87.25).into_placement(),
        ],
        policy,
        "owner@example.com",
        created_at,
    )
}

/// SQLite configuration pointing at a file inside `dir`.
pub fn sqlite_config(dir: &Path) -> DatabaseConfig {
    DatabaseConfig {
        provider: "sqlite".to_string(),
        url: format!("sqlite://{}", dir.join("links.db").display()),
        max_connections: 4,
        ..DatabaseConfig::default()
    }
}

/// Open a migrated SQLite store inside `dir`.
pub async fn sqlite_store(dir: &Path) -> Arc<dyn LinkStore> {
    burnlink_database::open_store(&sqlite_config(dir))
        .await
        .expect("sqlite store should open")
}

/// A fresh in-memory store.
pub fn memory_store() -> Arc<dyn LinkStore> {
    Arc::new(MemoryLinkStore::new())
}
