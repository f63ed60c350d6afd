//! Unified application error types for BurnLink.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Why a link creation request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidInputReason {
    /// The document is missing or empty.
    NoDocument,
    /// The document media type is not accepted, or it is too large.
    UnsupportedDocument,
    /// The watermark placement list is empty.
    NoWatermarks,
    /// A watermark lies outside the render area or reuses an id.
    BadWatermark,
    /// The destruction delay is zero, too long, or not an allowed choice.
    BadDuration,
    /// The display file name is blank.
    BadFileName,
    /// The notification address is blank.
    BadNotifyTarget,
}

impl InvalidInputReason {
    /// Machine-readable code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDocument => "NO_DOCUMENT",
            Self::UnsupportedDocument => "UNSUPPORTED_DOCUMENT",
            Self::NoWatermarks => "NO_WATERMARKS",
            Self::BadWatermark => "BAD_WATERMARK",
            Self::BadDuration => "BAD_DURATION",
            Self::BadFileName => "BAD_FILE_NAME",
            Self::BadNotifyTarget => "BAD_NOTIFY_TARGET",
        }
    }
}

impl fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Creation-time validation failed. No state was mutated.
    InvalidInput(InvalidInputReason),
    /// The link id is unknown or the link no longer exists.
    NotFound,
    /// The link id is known but its single view was already consumed.
    AlreadyDestroyed,
    /// The link store could not be reached or timed out.
    StoreUnavailable,
    /// A notification could not be delivered.
    NotificationFailure,
    /// Concurrent transitions kept colliding on the same link.
    Conflict,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "INVALID_INPUT({reason})"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AlreadyDestroyed => write!(f, "ALREADY_DESTROYED"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::NotificationFailure => write!(f, "NOTIFICATION_FAILURE"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout BurnLink.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a creation-time validation error.
    pub fn invalid_input(reason: InvalidInputReason, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput(reason), message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an already-destroyed error.
    pub fn already_destroyed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyDestroyed, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a notification failure.
    pub fn notification(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotificationFailure, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns the validation reason if this is an `InvalidInput` error.
    pub fn invalid_reason(&self) -> Option<InvalidInputReason> {
        match self.kind {
            ErrorKind::InvalidInput(reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether the link is gone from the viewer's point of view.
    ///
    /// `NotFound` and `AlreadyDestroyed` share one user-facing denial.
    pub fn is_link_gone(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound | ErrorKind::AlreadyDestroyed)
    }

    /// Whether a caller may transparently retry a read or a tick.
    ///
    /// Opens must never be retried automatically: a retried open on a
    /// single-view link reads as a second view.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::StoreUnavailable | ErrorKind::Conflict)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
