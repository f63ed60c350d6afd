//! Behavior shared by every link store backend.

mod helpers;

use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;

use burnlink_core::error::ErrorKind;
use burnlink_core::types::id::LinkId;
use burnlink_database::{CasOutcome, LinkChange, LinkLookup, LinkStore, OpenedLink};
use burnlink_entity::{DestructionCause, DestructionPolicy, LinkOverview, LinkState};

use helpers::{memory_store, sample_record, sqlite_store, t0};

async fn put_then_get_keeps_content(store: Arc<dyn LinkStore>) {
    let record = sample_record(DestructionPolicy::AfterDuration { seconds: 60 }, t0());
    assert_eq!(store.put(&record).await.unwrap(), 1);

    let loaded = store.get(&record.id).await.unwrap().expect("record should exist");
    assert_eq!(loaded.watermarks, record.watermarks);
    assert_eq!(loaded.policy, record.policy);
    assert_eq!(loaded.document, record.document);
    assert_eq!(loaded, record);
}

async fn put_is_an_upsert(store: Arc<dyn LinkStore>) {
    let mut record = sample_record(DestructionPolicy::AfterFirstView, t0());
    store.put(&record).await.unwrap();
    record.file_name = "renamed.pdf".to_string();
    assert_eq!(store.put(&record).await.unwrap(), 2);

    let overviews = store.list_overviews().await.unwrap();
    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0].file_name, "renamed.pdf");
    let loaded = store.get(&record.id).await.unwrap().unwrap();
    assert_eq!(loaded.file_name, "renamed.pdf");
}

async fn stale_version_conflicts(store: Arc<dyn LinkStore>) {
    let record = sample_record(DestructionPolicy::AfterFirstView, t0());
    store.put(&record).await.unwrap();

    let mut opened = record.clone();
    opened.state = LinkState::Opened { opened_at: t0() };

    let first = store
        .compare_and_swap(&record.id, 1, LinkChange::Update(opened.clone()))
        .await
        .unwrap();
    assert_eq!(first, CasOutcome::Applied { version: 2 });

    let second = store
        .compare_and_swap(&record.id, 1, LinkChange::Update(opened))
        .await
        .unwrap();
    assert_eq!(second, CasOutcome::Conflict);
}

async fn destroy_leaves_tombstone(store: Arc<dyn LinkStore>) {
    let record = sample_record(DestructionPolicy::AfterFirstView, t0());
    store.put(&record).await.unwrap();

    let outcome = store
        .compare_and_swap(
            &record.id,
            1,
            LinkChange::Destroy {
                cause: DestructionCause::Consumed,
                at: t0(),
            },
        )
        .await
        .unwrap();
    assert!(outcome.is_applied());

    assert!(store.get(&record.id).await.unwrap().is_none());
    match store.lookup(&record.id).await.unwrap() {
        LinkLookup::Destroyed(tombstone) => {
            assert_eq!(tombstone.cause, DestructionCause::Consumed);
            assert_eq!(tombstone.destroyed_at, t0());
        }
        other => panic!("expected tombstone, got {other:?}"),
    }
    assert!(store.list_overviews().await.unwrap().is_empty());

    // Destroyed ids never come back.
    let err = store.put(&record).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    let again = store
        .compare_and_swap(&record.id, 1, LinkChange::Update(record.clone()))
        .await
        .unwrap();
    assert_eq!(again, CasOutcome::Conflict);
}

async fn delete_is_idempotent(store: Arc<dyn LinkStore>) {
    let record = sample_record(DestructionPolicy::AfterDuration { seconds: 10 }, t0());
    store.put(&record).await.unwrap();

    assert!(store.delete(&record.id, DestructionCause::Revoked, t0()).await.unwrap());
    assert!(!store.delete(&record.id, DestructionCause::Revoked, t0()).await.unwrap());

    let unknown = LinkId::generate(32);
    assert!(!store.delete(&unknown, DestructionCause::Revoked, t0()).await.unwrap());
    assert_eq!(store.lookup(&unknown).await.unwrap(), LinkLookup::Unknown);
}

async fn list_is_oldest_first(store: Arc<dyn LinkStore>) {
    let newer = sample_record(DestructionPolicy::AfterFirstView, t0() + Duration::seconds(30));
    let older = sample_record(DestructionPolicy::AfterFirstView, t0());
    store.put(&newer).await.unwrap();
    store.put(&older).await.unwrap();

    let ids: Vec<LinkId> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![older.id.clone(), newer.id.clone()]);

    let overview_ids: Vec<LinkId> = store
        .list_overviews()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(overview_ids, vec![older.id, newer.id]);
}

async fn overviews_match_records_without_documents(store: Arc<dyn LinkStore>) {
    let mut record = sample_record(DestructionPolicy::AfterDuration { seconds: 300 }, t0());
    store.put(&record).await.unwrap();
    record.state = LinkState::Opened {
        opened_at: t0() + Duration::seconds(5),
    };
    record.capture_attempts = 2;
    store
        .compare_and_swap(&record.id, 1, LinkChange::Update(record.clone()))
        .await
        .unwrap();

    let overviews = store.list_overviews().await.unwrap();
    assert_eq!(overviews, vec![LinkOverview::from(&record)]);
    assert_eq!(overviews[0].document_bytes, record.document.len());
    assert_eq!(overviews[0].media_type, "application/pdf");
    assert_eq!(overviews[0].watermark_count, 2);
    assert_eq!(overviews[0].capture_attempts, 2);
}

async fn opened_listing_follows_state(store: Arc<dyn LinkStore>) {
    let active = sample_record(DestructionPolicy::AfterDuration { seconds: 60 }, t0());
    let late = sample_record(DestructionPolicy::AfterDuration { seconds: 60 }, t0());
    let early = sample_record(DestructionPolicy::AfterDuration { seconds: 60 }, t0());
    let gone = sample_record(DestructionPolicy::AfterDuration { seconds: 60 }, t0());
    for record in [&active, &late, &early, &gone] {
        store.put(record).await.unwrap();
    }
    for (record, offset) in [(&late, 20), (&early, 10), (&gone, 5)] {
        let mut opened = record.clone();
        opened.state = LinkState::Opened {
            opened_at: t0() + Duration::seconds(offset),
        };
        store
            .compare_and_swap(&record.id, 1, LinkChange::Update(opened))
            .await
            .unwrap();
    }
    store
        .delete(&gone.id, DestructionCause::Expired, t0() + Duration::seconds(70))
        .await
        .unwrap();

    assert_eq!(
        store.list_opened().await.unwrap(),
        vec![
            OpenedLink {
                id: early.id.clone(),
                opened_at: t0() + Duration::seconds(10),
            },
            OpenedLink {
                id: late.id.clone(),
                opened_at: t0() + Duration::seconds(20),
            },
        ]
    );
}

async fn purge_drops_only_old_tombstones(store: Arc<dyn LinkStore>) {
    let old = sample_record(DestructionPolicy::AfterFirstView, t0());
    let recent = sample_record(DestructionPolicy::AfterFirstView, t0());
    store.put(&old).await.unwrap();
    store.put(&recent).await.unwrap();
    store.delete(&old.id, DestructionCause::Expired, t0()).await.unwrap();
    store
        .delete(&recent.id, DestructionCause::Expired, t0() + Duration::hours(2))
        .await
        .unwrap();

    let purged = store.purge_tombstones(t0() + Duration::hours(1)).await.unwrap();
    assert_eq!(purged, 1);
    assert_eq!(store.lookup(&old.id).await.unwrap(), LinkLookup::Unknown);
    assert!(matches!(
        store.lookup(&recent.id).await.unwrap(),
        LinkLookup::Destroyed(_)
    ));
}

async fn racing_destroys_apply_once(store: Arc<dyn LinkStore>) {
    let record = sample_record(DestructionPolicy::AfterDuration { seconds: 10 }, t0());
    store.put(&record).await.unwrap();

    let attempts = (0..8).map(|_| {
        let store = Arc::clone(&store);
        let id = record.id.clone();
        tokio::spawn(async move {
            store
                .compare_and_swap(
                    &id,
                    1,
                    LinkChange::Destroy {
                        cause: DestructionCause::Expired,
                        at: t0(),
                    },
                )
                .await
                .unwrap()
        })
    });

    let applied = join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .filter(CasOutcome::is_applied)
        .count();
    assert_eq!(applied, 1);
}

macro_rules! store_tests {
    ($($name:ident),* $(,)?) => {
        mod memory {
            use super::*;
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(memory_store()).await;
                }
            )*
        }

        mod sqlite {
            use super::*;
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $name() {
                    let dir = tempfile::tempdir().unwrap();
                    super::$name(sqlite_store(dir.path()).await).await;
                }
            )*
        }
    };
}

store_tests!(
    put_then_get_keeps_content,
    put_is_an_upsert,
    stale_version_conflicts,
    destroy_leaves_tombstone,
    delete_is_idempotent,
    list_is_oldest_first,
    overviews_match_records_without_documents,
    opened_listing_follows_state,
    purge_drops_only_old_tombstones,
    racing_destroys_apply_once,
);
