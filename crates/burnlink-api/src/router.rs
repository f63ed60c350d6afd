//! Route definitions for the BurnLink HTTP API.
//!
//! Administrator and viewer endpoints are mounted under `/api`; the
//! shareable URL `/view?id=...` sits at the root.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(link_routes())
        .merge(view_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .route("/view", get(handlers::view::open_link))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(middleware::logging::make_span))
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Administrator link management
fn link_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            get(handlers::link::list_links).post(handlers::link::create_link),
        )
        .route(
            "/links/{id}",
            get(handlers::link::get_link).delete(handlers::link::delete_link),
        )
}

/// Countdown ticks and capture reports from the display surface
fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/view/{id}/tick", post(handlers::view::tick))
        .route(
            "/view/{id}/capture-attempts",
            post(handlers::view::report_capture_attempt),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
