//! Server bootstrap: store, services, sweeper, and the HTTP listener.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use burnlink_core::config::AppConfig;
use burnlink_core::error::AppError;
use burnlink_core::result::AppResult;
use burnlink_service::build_sink;
use burnlink_worker::ExpirySweeper;

use crate::router::build_router;
use crate::state::AppState;

/// Open the store, wire the services, and serve until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let config = Arc::new(config);

    info!(provider = %config.database.provider, "Opening link store");
    let store = burnlink_database::open_store(&config.database).await?;

    let sink = build_sink(&config.notifications)?;
    info!(sink = sink.name(), "Notification sink ready");

    let state = AppState::new(Arc::clone(&config), store, sink);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = if config.worker.enabled {
        let sweeper = ExpirySweeper::new(
            Arc::clone(&state.store),
            Arc::clone(&state.viewer_service),
            &config,
        );
        info!(
            interval_seconds = config.worker.sweep_interval_seconds,
            "Starting expiry sweeper"
        );
        Some(tokio::spawn(async move {
            sweeper.run(shutdown_rx).await;
        }))
    } else {
        info!("Expiry sweeper disabled");
        None
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("BurnLink server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = sweeper_handle {
        let _ = tokio::time::timeout(Duration::from_secs(10), handle).await;
    }

    info!("BurnLink server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
