//! CLI command definitions and dispatch.

pub mod config;
pub mod link;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use burnlink_core::config::AppConfig;
use burnlink_core::error::AppError;
use burnlink_database::LinkStore;

use crate::output::OutputFormat;

/// BurnLink: self-destructing document links
#[derive(Debug, Parser)]
#[command(name = "burnlink", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Link administration
    Links(link::LinkArgs),
    /// Apply database migrations
    Migrate,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Links(args) => link::execute(args, &self.config, self.format).await,
            Commands::Migrate => migrate::execute(&self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: open the configured link store
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn LinkStore>, AppError> {
    burnlink_database::open_store(&config.database).await
}
