//! # burnlink-api
//!
//! HTTP API layer for BurnLink built on Axum.
//!
//! Provides the administrator endpoints under `/api/links`, the viewer
//! endpoints (`/view` and `/api/view/{id}/...`), middleware (CORS, request
//! logging), DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
