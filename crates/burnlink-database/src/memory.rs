//! In-process link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use burnlink_core::error::AppError;
use burnlink_core::result::AppResult;
use burnlink_core::types::id::LinkId;
use burnlink_entity::{DestructionCause, LinkOverview, LinkRecord, Tombstone};

use crate::store::{CasOutcome, LinkChange, LinkLookup, LinkStore, OpenedLink, Versioned};

/// One id's slot. Live records and tombstones share a map so a destroy
/// swaps one for the other under a single entry lock.
#[derive(Debug, Clone)]
enum Slot {
    Live(Versioned<LinkRecord>),
    Destroyed(Tombstone),
}

/// Link store backed by a sharded concurrent map. Contents are lost when
/// the process exits.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    slots: DashMap<LinkId, Slot>,
}

impl MemoryLinkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, record: &LinkRecord) -> AppResult<u64> {
        match self.slots.entry(record.id.clone()) {
            Entry::Occupied(mut entry) => match entry.get() {
                Slot::Destroyed(_) => Err(AppError::conflict(format!(
                    "Link {} was destroyed and cannot be stored again",
                    record.id.fingerprint()
                ))),
                Slot::Live(current) => {
                    let version = current.version + 1;
                    entry.insert(Slot::Live(Versioned {
                        record: record.clone(),
                        version,
                    }));
                    Ok(version)
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(Slot::Live(Versioned {
                    record: record.clone(),
                    version: 1,
                }));
                Ok(1)
            }
        }
    }

    async fn lookup(&self, id: &LinkId) -> AppResult<LinkLookup> {
        Ok(match self.slots.get(id).map(|slot| slot.value().clone()) {
            Some(Slot::Live(versioned)) => LinkLookup::Live(versioned),
            Some(Slot::Destroyed(tombstone)) => LinkLookup::Destroyed(tombstone),
            None => LinkLookup::Unknown,
        })
    }

    async fn compare_and_swap(
        &self,
        id: &LinkId,
        expected_version: u64,
        change: LinkChange,
    ) -> AppResult<CasOutcome> {
        let Entry::Occupied(mut entry) = self.slots.entry(id.clone()) else {
            return Ok(CasOutcome::Conflict);
        };

        let Slot::Live(current) = entry.get() else {
            return Ok(CasOutcome::Conflict);
        };
        if current.version != expected_version {
            return Ok(CasOutcome::Conflict);
        }

        match change {
            LinkChange::Update(record) => {
                let version = expected_version + 1;
                entry.insert(Slot::Live(Versioned { record, version }));
                Ok(CasOutcome::Applied { version })
            }
            LinkChange::Destroy { cause, at } => {
                let tombstone = Tombstone::for_record(&current.record, cause, at);
                entry.insert(Slot::Destroyed(tombstone));
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
        match self.slots.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let tombstone = match entry.get() {
                    Slot::Live(current) => Tombstone::for_record(&current.record, cause, at),
                    Slot::Destroyed(_) => return Ok(false),
                };
                entry.insert(Slot::Destroyed(tombstone));
                Ok(true)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }

    async fn list(&self) -> AppResult<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self
            .slots
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Live(versioned) => Some(versioned.record.clone()),
                Slot::Destroyed(_) => None,
            })
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn list_overviews(&self) -> AppResult<Vec<LinkOverview>> {
        let mut overviews: Vec<LinkOverview> = self
            .slots
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Live(versioned) => Some(LinkOverview::from(&versioned.record)),
                Slot::Destroyed(_) => None,
            })
            .collect();
        overviews.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(overviews)
    }

    async fn list_opened(&self) -> AppResult<Vec<OpenedLink>> {
        let mut opened: Vec<OpenedLink> = self
            .slots
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Live(versioned) => versioned.record.opened_at().map(|opened_at| OpenedLink {
                    id: versioned.record.id.clone(),
                    opened_at,
                }),
                Slot::Destroyed(_) => None,
            })
            .collect();
        opened.sort_by(|a, b| a.opened_at.cmp(&b.opened_at).then_with(|| a.id.cmp(&b.id)));
        Ok(opened)
    }

    async fn purge_tombstones(&self, older_than: DateTime<Utc>) -> AppResult<u64> {
        let mut purged = 0u64;
        self.slots.retain(|_, slot| match slot {
            Slot::Destroyed(tombstone) if tombstone.destroyed_at < older_than => {
                purged += 1;
                false
            }
            _ => true,
        });
        Ok(purged)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
