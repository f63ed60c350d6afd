//! Request/response logging middleware.
//!
//! Link tokens travel in paths and query strings, so only the matched
//! route template is ever logged.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{MatchedPath, Request};
use axum::http;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, info, info_span};

fn route_of<B>(request: &http::Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "<unmatched>".to_string())
}

/// Span factory for `TraceLayer` that leaves the URI out.
pub fn make_span(request: &http::Request<Body>) -> Span {
    info_span!(
        "http",
        method = %request.method(),
        route = %route_of(request),
    )
}

/// Logs request method, route, status, and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = route_of(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}
