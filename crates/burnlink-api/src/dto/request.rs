//! Request DTOs with validation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use burnlink_core::error::{AppError, ErrorKind, InvalidInputReason};
use burnlink_entity::{DestructionPolicy, Document, NewWatermark};
use burnlink_service::NewLink;

/// Create link request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Display name of the document.
    #[validate(length(max = 255, message = "File name must be at most 255 characters"))]
    pub file_name: String,
    /// Document media type.
    #[serde(default = "default_media_type")]
    #[validate(length(max = 127, message = "Media type must be at most 127 characters"))]
    pub media_type: String,
    /// Document bytes, standard base64.
    #[serde(default)]
    pub document: String,
    /// Watermark placements from the editor.
    #[serde(default)]
    pub watermarks: Vec<NewWatermark>,
    /// Destruction policy.
    pub policy: DestructionPolicy,
    /// Address notified on open.
    #[validate(length(max = 320, message = "Notify target must be at most 320 characters"))]
    pub notify_target: String,
}

fn default_media_type() -> String {
    "application/pdf".to_string()
}

impl CreateLinkRequest {
    /// Check field formats and decode the document.
    pub fn into_new_link(self) -> Result<NewLink, AppError> {
        self.validate().map_err(rejection)?;

        let bytes = STANDARD.decode(self.document.as_bytes()).map_err(|e| {
            AppError::with_source(
                ErrorKind::InvalidInput(InvalidInputReason::UnsupportedDocument),
                "Document is not valid base64",
                e,
            )
        })?;

        Ok(NewLink {
            document: Document::new(self.media_type, bytes),
            file_name: self.file_name,
            watermarks: self.watermarks,
            policy: self.policy,
            notify_target: self.notify_target,
        })
    }
}

fn rejection(errors: ValidationErrors) -> AppError {
    let fields = errors.field_errors();
    let reason = if fields.contains_key("media_type") {
        InvalidInputReason::UnsupportedDocument
    } else if fields.contains_key("file_name") {
        InvalidInputReason::BadFileName
    } else {
        InvalidInputReason::BadNotifyTarget
    };
    AppError::invalid_input(reason, errors.to_string())
}

/// Query string of the shareable URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewQuery {
    /// Link token.
    pub id: String,
}
