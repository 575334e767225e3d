//! # Platter API Server
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter API Server                               │
//! │                                                                         │
//! │  Browser ───► HTTP (5000) ───► Routes ───► Engines ───► SQLite         │
//! │                  │                                                      │
//! │                  └── Authorization: Bearer <jwt>                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use platter_api::auth::TokenVerifier;
use platter_api::config::ApiConfig;
use platter_api::{router, AppState};
use platter_db::Database;
use platter_engine::Platter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,platter=debug,sqlx=warn")),
        )
        .with_target(true)
        .init();

    info!("Starting Platter API server...");

    // Load configuration
    let config = ApiConfig::load().context("loading configuration")?;
    info!(
        addr = %config.socket_addr(),
        db = %config.database_path.display(),
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db = Database::new(config.db_config())
        .await
        .context("opening database")?;
    info!("Database ready");

    let state = Arc::new(AppState::new(
        Platter::new(db.clone()),
        TokenVerifier::new(&config.jwt_secret),
    ));

    let listener = TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("binding {}", config.socket_addr()))?;
    info!(addr = %config.socket_addr(), "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    db.close().await;
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
