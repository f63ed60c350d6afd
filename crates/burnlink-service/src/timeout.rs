//! Deadline for individual store calls.

use std::future::Future;
use std::time::Duration;

use burnlink_core::error::AppError;
use burnlink_core::result::AppResult;

/// Run a store call, failing with `StoreUnavailable` once `limit` passes.
pub async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::store_unavailable(format!(
            "Link store {operation} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}
