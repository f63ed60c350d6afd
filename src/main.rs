//! BurnLink server: self-destructing document links.
//!
//! Loads configuration, installs logging, and hands off to the API crate.

use tracing_subscriber::{EnvFilter, fmt};

use burnlink_core::config::AppConfig;
use burnlink_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.database.provider,
        "Starting BurnLink"
    );

    if let Err(e) = burnlink_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `BURNLINK_CONFIG` (default `config/default.toml`)
/// and the environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("BURNLINK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
