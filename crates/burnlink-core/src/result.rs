//! Convenience result type alias for BurnLink.

use crate::error::AppError;

/// A specialized `Result` type for BurnLink operations.
pub type AppResult<T> = Result<T, AppError>;
