//! Link administration CLI commands.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use burnlink_core::config::AppConfig;
use burnlink_core::error::AppError;
use burnlink_core::types::id::LinkId;
use burnlink_database::LinkStore;
use burnlink_entity::{LinkState, LinkSummary};
use burnlink_service::{AdminService, LinkService, NotificationDispatcher, ViewerService, build_sink};
use burnlink_worker::ExpirySweeper;

use crate::output::{self, OutputFormat};

/// Arguments for link commands
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Link subcommand
    #[command(subcommand)]
    pub command: LinkCommand,
}

/// Link subcommands
#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// List live links, oldest first
    List,
    /// Show one link
    Show {
        /// Link id
        id: String,
    },
    /// Destroy a link now
    Revoke {
        /// Link id
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Run one expiry sweep and exit
    Sweep,
}

/// Link display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LinkRow {
    /// Link id
    id: String,
    /// File name
    file: String,
    /// Policy
    policy: String,
    /// State
    state: String,
    /// Watermarks
    watermarks: usize,
    /// Capture attempts
    captures: u32,
    /// Created at
    created_at: String,
}

impl From<&LinkSummary> for LinkRow {
    fn from(link: &LinkSummary) -> Self {
        Self {
            id: link.id.to_string(),
            file: link.file_name.clone(),
            policy: link.policy_summary.clone(),
            state: state_text(&link.state),
            watermarks: link.watermark_count,
            captures: link.capture_attempts,
            created_at: link.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn state_text(state: &LinkState) -> String {
    match state {
        LinkState::Opened { opened_at } => {
            format!("opened {}", opened_at.format("%Y-%m-%d %H:%M:%S"))
        }
        other => other.label().to_string(),
    }
}

fn parse_id(raw: &str) -> Result<LinkId, AppError> {
    raw.parse()
        .map_err(|e| AppError::not_found(format!("'{raw}' is not a link id: {e}")))
}

fn admin_service(config: &Arc<AppConfig>, store: &Arc<dyn LinkStore>) -> AdminService {
    AdminService::new(
        Arc::clone(store),
        Arc::new(LinkService::new(config.links.token_bytes)),
        Arc::clone(config),
    )
}

/// Execute link commands
pub async fn execute(
    args: &LinkArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = Arc::new(super::load_config(config_path)?);
    let store = super::open_store(&config).await?;

    match &args.command {
        LinkCommand::List => {
            let links = admin_service(&config, &store).list_links().await?;
            let rows: Vec<LinkRow> = links.iter().map(LinkRow::from).collect();
            match format {
                OutputFormat::Table => output::print_list(&rows, format),
                OutputFormat::Json => output::print_json(&links),
            }
        }
        LinkCommand::Show { id } => {
            let link = admin_service(&config, &store)
                .get_link(&parse_id(id)?)
                .await?;
            match format {
                OutputFormat::Table => {
                    output::print_kv("ID", link.id.as_str());
                    output::print_kv("URL", &link.url);
                    output::print_kv("File", &link.file_name);
                    output::print_kv("Media type", &link.media_type);
                    output::print_kv("Size (bytes)", &link.document_bytes.to_string());
                    output::print_kv("Policy", &link.policy_summary);
                    output::print_kv("State", &state_text(&link.state));
                    output::print_kv("Watermarks", &link.watermark_count.to_string());
                    output::print_kv("Capture attempts", &link.capture_attempts.to_string());
                    output::print_kv("Created", &link.created_at.to_rfc3339());
                }
                OutputFormat::Json => output::print_json(&link),
            }
        }
        LinkCommand::Revoke { id, yes } => {
            let id = parse_id(id)?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Destroy link {}? Anyone holding the URL loses access.",
                        id.fingerprint()
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = admin_service(&config, &store)
                .delete_link(&id, Utc::now())
                .await?;
            if removed {
                output::print_success("Link destroyed.");
            } else {
                output::print_success("Link was already gone.");
            }
        }
        LinkCommand::Sweep => {
            let sink = build_sink(&config.notifications)?;
            let dispatcher = Arc::new(NotificationDispatcher::new(
                sink,
                Duration::from_secs(config.notifications.timeout_seconds),
            ));
            let viewer = Arc::new(ViewerService::new(Arc::clone(&store), dispatcher, &config));
            let sweeper = ExpirySweeper::new(Arc::clone(&store), viewer, &config);

            let report = sweeper.sweep_once(Utc::now()).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success("Sweep complete.");
                    output::print_kv("Ticked", &report.ticked.to_string());
                    output::print_kv("Expired", &report.expired.to_string());
                    output::print_kv("Failed", &report.failed.to_string());
                    output::print_kv("Tombstones purged", &report.purged.to_string());
                }
                OutputFormat::Json => output::print_json(&report),
            }
        }
    }

    Ok(())
}
