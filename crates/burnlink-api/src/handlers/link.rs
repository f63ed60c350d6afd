//! Administrator link handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;

use burnlink_entity::LinkSummary;

use crate::dto::request::CreateLinkRequest;
use crate::dto::response::{ApiResponse, DeleteLinkResponse};
use crate::error::ApiError;
use crate::handlers::parse_link_id;
use crate::state::AppState;

/// POST /api/links
pub async fn create_link(
    State(state): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkSummary>>), ApiError> {
    let new_link = req.into_new_link()?;
    let record = state.admin_service.create_link(new_link, Utc::now()).await?;
    let url = state.admin_service.link_url(&record.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LinkSummary::from_record(&record, url))),
    ))
}

/// GET /api/links
pub async fn list_links(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LinkSummary>>>, ApiError> {
    let links = state.admin_service.list_links().await?;
    Ok(Json(ApiResponse::ok(links)))
}

/// GET /api/links/{id}
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LinkSummary>>, ApiError> {
    let id = parse_link_id(&id)?;
    let link = state.admin_service.get_link(&id).await?;
    Ok(Json(ApiResponse::ok(link)))
}

/// DELETE /api/links/{id}
///
/// Succeeds whether or not the link still exists.
pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteLinkResponse>>, ApiError> {
    let id = parse_link_id(&id)?;
    let removed = state.admin_service.delete_link(&id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(DeleteLinkResponse { id, removed })))
}
