//! The link store contract.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use burnlink_core::result::AppResult;
use burnlink_core::types::id::LinkId;
use burnlink_entity::{DestructionCause, LinkOverview, LinkRecord, Tombstone};

/// A value together with the store version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    /// The stored value.
    pub record: T,
    /// Monotonic per-record version, bumped on every write.
    pub version: u64,
}

/// Result of resolving a link id.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkLookup {
    /// The record is live.
    Live(Versioned<LinkRecord>),
    /// The record was destroyed and only its tombstone remains.
    Destroyed(Tombstone),
    /// The id was never issued, or its tombstone has been purged.
    Unknown,
}

/// An opened link whose countdown may need enforcing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedLink {
    /// Link token.
    pub id: LinkId,
    /// First successful open.
    pub opened_at: DateTime<Utc>,
}

/// A conditional write applied by [`LinkStore::compare_and_swap`].
#[derive(Debug, Clone, PartialEq)]
pub enum LinkChange {
    /// Replace the record.
    Update(LinkRecord),
    /// Remove the record and leave a tombstone.
    Destroy {
        /// Why the record is destroyed.
        cause: DestructionCause,
        /// When it is destroyed.
        at: DateTime<Utc>,
    },
}

/// Outcome of a compare-and-swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The change was applied. `version` is the new version, or the
    /// destroyed record's last version for a destroy.
    Applied {
        /// Version after the write.
        version: u64,
    },
    /// The record changed (or vanished) since it was read.
    Conflict,
}

impl CasOutcome {
    /// Whether the change was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Durable keyed storage of link records.
///
/// Every read-modify-write on a record goes through
/// [`compare_and_swap`](Self::compare_and_swap), so no two transitions on
/// the same id can interleave. A destroyed record is never returned again.
#[async_trait]
pub trait LinkStore: Send + Sync + Debug + 'static {
    /// Backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Insert or replace a record and return its new version.
    ///
    /// Fails with `Conflict` if the id has been destroyed.
    async fn put(&self, record: &LinkRecord) -> AppResult<u64>;

    /// Resolve an id to a live record, a tombstone, or nothing.
    async fn lookup(&self, id: &LinkId) -> AppResult<LinkLookup>;

    /// Fetch a live record. Destroyed and unknown ids both yield `None`.
    async fn get(&self, id: &LinkId) -> AppResult<Option<LinkRecord>> {
        Ok(match self.lookup(id).await? {
            LinkLookup::Live(versioned) => Some(versioned.record),
            LinkLookup::Destroyed(_) | LinkLookup::Unknown => None,
        })
    }

    /// Apply `change` only if the record is still at `expected_version`.
    async fn compare_and_swap(
        &self,
        id: &LinkId,
        expected_version: u64,
        change: LinkChange,
    ) -> AppResult<CasOutcome>;

    /// Destroy a record regardless of its version.
    ///
    /// Returns `true` if a live record was removed. Deleting an absent or
    /// already destroyed id succeeds and returns `false`.
    async fn delete(&self, id: &LinkId, cause: DestructionCause, at: DateTime<Utc>)
    -> AppResult<bool>;

    /// All live records with their documents, oldest first.
    async fn list(&self) -> AppResult<Vec<LinkRecord>>;

    /// Overviews of all live records, oldest first. Documents are not read.
    async fn list_overviews(&self) -> AppResult<Vec<LinkOverview>>;

    /// Live records in the opened state, earliest opened first.
    async fn list_opened(&self) -> AppResult<Vec<OpenedLink>>;

    /// Drop tombstones destroyed before `older_than`. Returns how many were dropped.
    async fn purge_tombstones(&self, older_than: DateTime<Utc>) -> AppResult<u64>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
