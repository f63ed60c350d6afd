//! SQLite link store.
//!
//! Live records live in `links` as JSON with an integer `version`; every
//! write bumps it, and conditional writes filter on it. Each row also keeps
//! a document-free overview and the open time, which listings read instead
//! of the record. Destroying a record
//! deletes its row and inserts a `link_tombstones` row in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use burnlink_core::error::{AppError, ErrorKind};
use burnlink_core::result::AppResult;
use burnlink_core::types::id::LinkId;
use burnlink_entity::{DestructionCause, LinkOverview, LinkRecord, Tombstone};

use crate::store::{CasOutcome, LinkChange, LinkLookup, LinkStore, OpenedLink, Versioned};

/// Durable link store on a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteLinkStore {
    pool: SqlitePool,
}

impl SqliteLinkStore {
    /// Create a store over a migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn from_millis(ms: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| {
        AppError::new(
            ErrorKind::Serialization,
            format!("Stored timestamp {ms} is out of range"),
        )
    })
}

fn decode_record(body: &str) -> AppResult<LinkRecord> {
    Ok(serde_json::from_str(body)?)
}

/// Column values written for a live record.
struct EncodedRow {
    record: String,
    overview: String,
    opened_at_ms: Option<i64>,
}

fn encode_row(record: &LinkRecord) -> AppResult<EncodedRow> {
    Ok(EncodedRow {
        record: serde_json::to_string(record)?,
        overview: serde_json::to_string(&LinkOverview::from(record))?,
        opened_at_ms: record.opened_at().map(|t| t.timestamp_millis()),
    })
}

async fn insert_tombstone(conn: &mut SqliteConnection, tombstone: &Tombstone) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO link_tombstones (id, cause, destroyed_at_ms, file_name, notify_target) \
         VALUES (?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
    )
    .bind(tombstone.id.as_str())
    .bind(tombstone.cause.as_str())
    .bind(tombstone.destroyed_at.timestamp_millis())
    .bind(&tombstone.file_name)
    .bind(&tombstone.notify_target)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to write tombstone", e))?;
    Ok(())
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn put(&self, record: &LinkRecord) -> AppResult<u64> {
        let row = encode_row(record)?;

        let version: Option<i64> = sqlx::query_scalar(
            "INSERT INTO links (id, version, record, overview, created_at_ms, opened_at_ms) \
             SELECT ?1, 1, ?2, ?3, ?4, ?5 \
             WHERE NOT EXISTS (SELECT 1 FROM link_tombstones WHERE id = ?1) \
             ON CONFLICT(id) DO UPDATE SET version = links.version + 1, \
             record = excluded.record, overview = excluded.overview, \
             opened_at_ms = excluded.opened_at_ms \
             RETURNING version",
        )
        .bind(record.id.as_str())
        .bind(&row.record)
        .bind(&row.overview)
        .bind(record.created_at.timestamp_millis())
        .bind(row.opened_at_ms)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to store link", e))?;

        match version {
            Some(version) => Ok(version as u64),
            None => Err(AppError::conflict(format!(
                "Link {} was destroyed and cannot be stored again",
                record.id.fingerprint()
            ))),
        }
    }

    async fn lookup(&self, id: &LinkId) -> AppResult<LinkLookup> {
        let live: Option<(i64, String)> =
            sqlx::query_as("SELECT version, record FROM links WHERE id = ?")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find link", e)
                })?;

        if let Some((version, body)) = live {
            return Ok(LinkLookup::Live(Versioned {
                record: decode_record(&body)?,
                version: version as u64,
            }));
        }

        let destroyed: Option<(String, i64, String, String)> = sqlx::query_as(
            "SELECT cause, destroyed_at_ms, file_name, notify_target \
             FROM link_tombstones WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find tombstone", e)
        })?;

        match destroyed {
            Some((cause, destroyed_at_ms, file_name, notify_target)) => {
                Ok(LinkLookup::Destroyed(Tombstone {
                    id: id.clone(),
                    cause: cause
                        .parse()
                        .map_err(|e: String| AppError::new(ErrorKind::Serialization, e))?,
                    destroyed_at: from_millis(destroyed_at_ms)?,
                    file_name,
                    notify_target,
                }))
            }
            None => Ok(LinkLookup::Unknown),
        }
    }

    async fn compare_and_swap(
        &self,
        id: &LinkId,
        expected_version: u64,
        change: LinkChange,
    ) -> AppResult<CasOutcome> {
        match change {
            LinkChange::Update(record) => {
                if record.id != *id {
                    return Err(AppError::internal("Record id does not match the swapped id"));
                }
                let row = encode_row(&record)?;

                let version: Option<i64> = sqlx::query_scalar(
                    "UPDATE links SET version = version + 1, record = ?, overview = ?, \
                     opened_at_ms = ? WHERE id = ? AND version = ? RETURNING version",
                )
                .bind(&row.record)
                .bind(&row.overview)
                .bind(row.opened_at_ms)
                .bind(id.as_str())
                .bind(expected_version as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to update link", e)
                })?;

                Ok(match version {
                    Some(version) => CasOutcome::Applied {
                        version: version as u64,
                    },
                    None => CasOutcome::Conflict,
                })
            }
            LinkChange::Destroy { cause, at } => {
                let mut tx = self.pool.begin().await.map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to begin transaction", e)
                })?;

                let removed: Option<String> = sqlx::query_scalar(
                    "DELETE FROM links WHERE id = ? AND version = ? RETURNING record",
                )
                .bind(id.as_str())
                .bind(expected_version as i64)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to destroy link", e)
                })?;

                let Some(body) = removed else {
                    tx.rollback().await.map_err(|e| {
                        AppError::with_source(ErrorKind::StoreUnavailable, "Failed to roll back", e)
                    })?;
                    return Ok(CasOutcome::Conflict);
                };

                let tombstone = Tombstone::for_record(&decode_record(&body)?, cause, at);
                insert_tombstone(&mut *tx, &tombstone).await?;
                tx.commit().await.map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to commit destroy", e)
                })?;

                debug!(link = %id.fingerprint(), %cause, "Link destroyed");
                Ok(CasOutcome::Applied {
                    version: expected_version,
                })
            }
        }
    }

    async fn delete(
        &self,
        id: &LinkId,
        cause: DestructionCause,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to begin transaction", e)
        })?;

        let removed: Option<String> =
            sqlx::query_scalar("DELETE FROM links WHERE id = ? RETURNING record")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to delete link", e)
                })?;

        if let Some(body) = &removed {
            let tombstone = Tombstone::for_record(&decode_record(body)?, cause, at);
            insert_tombstone(&mut *tx, &tombstone).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to commit delete", e)
        })?;

        Ok(removed.is_some())
    }

    async fn list(&self) -> AppResult<Vec<LinkRecord>> {
        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT record FROM links ORDER BY created_at_ms, id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list links", e)
                })?;

        bodies.iter().map(String::as_str).map(decode_record).collect()
    }

    async fn list_overviews(&self) -> AppResult<Vec<LinkOverview>> {
        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT overview FROM links ORDER BY created_at_ms, id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list links", e)
                })?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(AppError::from))
            .collect()
    }

    async fn list_opened(&self) -> AppResult<Vec<OpenedLink>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT id, opened_at_ms FROM links WHERE opened_at_ms IS NOT NULL \
             ORDER BY opened_at_ms, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list opened links", e)
        })?;

        rows.into_iter()
            .map(|(id, opened_at_ms)| {
                let id = id.parse::<LinkId>().map_err(|e| {
                    AppError::with_source(ErrorKind::Serialization, "Stored link id is malformed", e)
                })?;
                Ok(OpenedLink {
                    id,
                    opened_at: from_millis(opened_at_ms)?,
                })
            })
            .collect()
    }

    async fn purge_tombstones(&self, older_than: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM link_tombstones WHERE destroyed_at_ms < ?")
            .bind(older_than.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to purge tombstones", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Health check failed", e))
    }
}
