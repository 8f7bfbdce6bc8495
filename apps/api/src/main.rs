//! # MedRef API
//!
//! HTTP server for medicine search and export.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  Browser ───► HTTP (8000) ───► Routes ───► SQLite                      │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                           medref-export                                 │
//! │                        (spawn_blocking)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medref_api::{build_router, ApiConfig, AppState};
use medref_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting MedRef API server...");

    // Load configuration
    let config = ApiConfig::load().context("loading configuration")?;
    let addr = config.socket_addr()?;
    info!(
        %addr,
        db_path = %config.database_path.display(),
        max_connections = config.max_connections,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(config.db_config())
        .await
        .context("opening database")?;
    info!("Database ready");

    // Create shared state
    let state = Arc::new(AppState { db, config });
    let app = build_router(state.clone());

    // Start server
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
