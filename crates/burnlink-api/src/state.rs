//! Shared application state passed to all Axum handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use burnlink_core::config::AppConfig;
use burnlink_core::traits::NotificationSink;
use burnlink_database::LinkStore;
use burnlink_service::{AdminService, LinkService, NotificationDispatcher, ViewerService};

/// Application state shared across all request handlers.
///
/// Wrapped in `Arc` pieces so cloning per request is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Link store backing both services.
    pub store: Arc<dyn LinkStore>,
    /// Administrator operations.
    pub admin_service: Arc<AdminService>,
    /// Viewer operations.
    pub viewer_service: Arc<ViewerService>,
    /// Process start, for the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    /// Wire the services over one store and one notification sink.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn LinkStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            sink,
            Duration::from_secs(config.notifications.timeout_seconds),
        ));
        let link_service = Arc::new(LinkService::new(config.links.token_bytes));
        let admin_service = Arc::new(AdminService::new(
            Arc::clone(&store),
            link_service,
            Arc::clone(&config),
        ));
        let viewer_service = Arc::new(ViewerService::new(
            Arc::clone(&store),
            dispatcher,
            &config,
        ));

        Self {
            config,
            store,
            admin_service,
            viewer_service,
            started_at: Instant::now(),
        }
    }
}
