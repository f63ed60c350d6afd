//! Viewer handlers.
//!
//! These are the only routes a link recipient touches. Responses carrying
//! document content are marked `no-store`.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;

use burnlink_service::{CaptureReport, TickResult};

use crate::dto::request::ViewQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::handlers::parse_link_id;
use crate::state::AppState;

/// GET /view?id={id}
pub async fn open_link(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_link_id(&query.id)?;
    let payload = state.viewer_service.open_link(&id, Utc::now()).await?;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(ApiResponse::ok(payload)),
    ))
}

/// POST /api/view/{id}/tick
pub async fn tick(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TickResult>>, ApiError> {
    let id = parse_link_id(&id)?;
    let result = state.viewer_service.tick(&id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/view/{id}/capture-attempts
pub async fn report_capture_attempt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CaptureReport>>, ApiError> {
    let id = parse_link_id(&id)?;
    let report = state
        .viewer_service
        .report_capture_attempt(&id, Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
