//! Database migration command.

use burnlink_core::error::AppError;
use burnlink_database::DatabasePool;
use burnlink_database::migration::run_migrations;

use crate::output;

/// Apply pending migrations to the configured SQLite database.
pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    if config.database.provider != "sqlite" {
        println!(
            "Provider '{}' keeps no schema; nothing to migrate.",
            config.database.provider
        );
        return Ok(());
    }

    println!("Running database migrations...");
    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    pool.close().await;
    output::print_success("All migrations applied successfully.");

    Ok(())
}
