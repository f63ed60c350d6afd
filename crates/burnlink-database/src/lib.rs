//! # burnlink-database
//!
//! The [`LinkStore`] contract and its implementations: a durable SQLite
//! store and an in-process store for tests and ephemeral runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use burnlink_core::config::DatabaseConfig;
use burnlink_core::error::AppError;
use burnlink_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::MemoryLinkStore;
pub use repositories::SqliteLinkStore;
pub use store::{CasOutcome, LinkChange, LinkLookup, LinkStore, OpenedLink, Versioned};

/// Open the store selected by `database.provider`.
///
/// For SQLite this connects the pool and applies pending migrations.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn LinkStore>> {
    match config.provider.as_str() {
        "memory" => {
            info!("Using in-memory link store; links will not survive a restart");
            Ok(Arc::new(MemoryLinkStore::new()))
        }
        "sqlite" => {
            let pool = DatabasePool::connect(config).await?;
            migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(SqliteLinkStore::new(pool.into_pool())))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider '{other}'"
        ))),
    }
}
