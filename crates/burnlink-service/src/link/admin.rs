//! Administrator operations: create, list, inspect, revoke.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use burnlink_core::config::AppConfig;
use burnlink_core::error::{AppError, InvalidInputReason};
use burnlink_core::result::AppResult;
use burnlink_core::types::id::LinkId;
use burnlink_database::LinkStore;
use burnlink_entity::{
    DestructionCause, DestructionPolicy, Document, LinkRecord, LinkSummary, NewWatermark,
    WatermarkPlacement,
};

use super::token::LinkService;
use crate::timeout::bounded;

/// A link creation request from the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLink {
    /// The protected document.
    pub document: Document,
    /// Display name of the document.
    pub file_name: String,
    /// Editor output, in placement order.
    pub watermarks: Vec<NewWatermark>,
    /// Destruction policy.
    pub policy: DestructionPolicy,
    /// Address notified when the document is opened.
    pub notify_target: String,
}

/// Creates and manages links on behalf of the administrator.
#[derive(Debug, Clone)]
pub struct AdminService {
    /// Link store.
    store: Arc<dyn LinkStore>,
    /// Token generator.
    link_service: Arc<LinkService>,
    /// Application configuration.
    config: Arc<AppConfig>,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        store: Arc<dyn LinkStore>,
        link_service: Arc<LinkService>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            link_service,
            config,
        }
    }

    fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.config.database.operation_timeout_ms)
    }

    /// Validates and persists a new link in the `Active` state.
    ///
    /// Checks run in a fixed order and the first failure is reported.
    /// Nothing is written when validation fails.
    pub async fn create_link(&self, req: NewLink, now: DateTime<Utc>) -> AppResult<LinkRecord> {
        let watermarks = self.validate(&req)?;

        let record = LinkRecord::new(
            self.link_service.generate_token(),
            req.document,
            req.file_name.trim(),
            watermarks,
            req.policy,
            req.notify_target.trim(),
            now,
        );

        bounded(self.op_timeout(), "put", self.store.put(&record)).await?;

        info!(
            link = %record.id.fingerprint(),
            file_name = %record.file_name,
            policy = record.policy.label(),
            watermarks = record.watermarks.len(),
            document_bytes = record.document.len(),
            "Link created"
        );

        Ok(record)
    }

    fn validate(&self, req: &NewLink) -> AppResult<Vec<WatermarkPlacement>> {
        let rules = &self.config.links;

        if req.document.is_empty() {
            return Err(AppError::invalid_input(
                InvalidInputReason::NoDocument,
                "A document is required",
            ));
        }
        if !rules.accepted_media_types.is_empty()
            && !rules
                .accepted_media_types
                .iter()
                .any(|m| m.eq_ignore_ascii_case(req.document.media_type.trim()))
        {
            return Err(AppError::invalid_input(
                InvalidInputReason::UnsupportedDocument,
                format!("Media type '{}' is not accepted", req.document.media_type),
            ));
        }
        if req.document.len() > rules.max_document_bytes {
            return Err(AppError::invalid_input(
                InvalidInputReason::UnsupportedDocument,
                format!(
                    "Document is {} bytes; the limit is {}",
                    req.document.len(),
                    rules.max_document_bytes
                ),
            ));
        }

        if req.watermarks.is_empty() {
            return Err(AppError::invalid_input(
                InvalidInputReason::NoWatermarks,
                "At least one watermark placement is required",
            ));
        }
        let placements: Vec<WatermarkPlacement> = req
            .watermarks
            .iter()
            .map(|w| w.into_placement())
            .collect();
        let mut seen = HashSet::with_capacity(placements.len());
        for (index, placement) in placements.iter().enumerate() {
            if !placement.is_within_bounds() {
                return Err(AppError::invalid_input(
                    InvalidInputReason::BadWatermark,
                    format!("Watermark {index} lies outside the render area"),
                ));
            }
            if !seen.insert(placement.id) {
                return Err(AppError::invalid_input(
                    InvalidInputReason::BadWatermark,
                    format!("Watermark id {} is used twice", placement.id),
                ));
            }
        }

        if let DestructionPolicy::AfterDuration { seconds } = req.policy {
            let allowed = if rules.allowed_durations_seconds.is_empty() {
                seconds > 0 && seconds <= rules.max_duration_seconds
            } else {
                rules.allowed_durations_seconds.contains(&seconds)
            };
            if !allowed {
                return Err(AppError::invalid_input(
                    InvalidInputReason::BadDuration,
                    format!("A destruction delay of {seconds} s is not allowed"),
                ));
            }
        }

        if req.file_name.trim().is_empty() {
            return Err(AppError::invalid_input(
                InvalidInputReason::BadFileName,
                "A file name is required",
            ));
        }
        if req.notify_target.trim().is_empty() {
            return Err(AppError::invalid_input(
                InvalidInputReason::BadNotifyTarget,
                "A notification address is required",
            ));
        }

        Ok(placements)
    }

    /// Lists all live links, oldest first.
    pub async fn list_links(&self) -> AppResult<Vec<LinkSummary>> {
        let overviews = bounded(self.op_timeout(), "list", self.store.list_overviews()).await?;
        Ok(overviews
            .into_iter()
            .map(|overview| {
                let url = self.link_url(&overview.id);
                LinkSummary::from_overview(overview, url)
            })
            .collect())
    }

    /// Shows one live link.
    pub async fn get_link(&self, id: &LinkId) -> AppResult<LinkSummary> {
        bounded(self.op_timeout(), "get", self.store.get(id))
            .await?
            .map(|r| self.summarize(&r))
            .ok_or_else(|| AppError::not_found("Link not found"))
    }

    /// Destroys a link ahead of its policy.
    ///
    /// Always permitted. Returns whether a live link was removed; revoking
    /// an absent link succeeds and returns `false`.
    pub async fn delete_link(&self, id: &LinkId, now: DateTime<Utc>) -> AppResult<bool> {
        let removed = bounded(
            self.op_timeout(),
            "delete",
            self.store.delete(id, DestructionCause::Revoked, now),
        )
        .await?;

        info!(link = %id.fingerprint(), removed, "Link revoked");
        Ok(removed)
    }

    /// Shareable URL for a link.
    pub fn link_url(&self, id: &LinkId) -> String {
        self.config.link_url(id.as_str())
    }

    fn summarize(&self, record: &LinkRecord) -> LinkSummary {
        LinkSummary::from_record(record, self.link_url(&record.id))
    }
}
