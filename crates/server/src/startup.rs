use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use service::{schema::initialize_schema, storage::EntryStore};

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(event = "signal_error", error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(event = "signal_error", error = %e, "failed to listen for SIGTERM");
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
    info!(event = "shutdown_signal", "shutdown requested, draining connections");
}

/// Public entry: connect the pool, prepare the schema, serve until a
/// shutdown signal, then close the pool.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("cannot connect to database")?;
    models::db::test_connection(&db)
        .await
        .context("database connectivity check failed")?;
    info!(event = "db_connected", "connected to database");

    initialize_schema(&db)
        .await
        .context("database schema initialization failed")?;

    common::env::ensure_env(&cfg.server.frontend_dir).await?;

    let store = EntryStore::new(db);
    let state = AppState::new(Arc::new(store.clone()));
    let app: Router = routes::build_router(state, build_cors(), &cfg.server.frontend_dir);

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!(%addr, "server running, health check at /api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await?;
    info!(event = "db_closed", "database pool closed");
    Ok(())
}
