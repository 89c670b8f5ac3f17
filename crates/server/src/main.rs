use std::sync::Arc;

use anyhow::Error as AnyhowError;
use server::{AppState, config::ServerConfig, http};
use store::{ClassStore, MemoryStore, TaskStore};
use thiserror::Error;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Error)]
pub enum ClassboardError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

#[tokio::main]
async fn main() -> Result<(), ClassboardError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},store={level},board={level},classes={level},utils={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).map_err(AnyhowError::from)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = ServerConfig::load()?;
    tracing::info!(roster_size = config.roster.len(), "configuration loaded");

    // The bundled backend; swapping in a hosted document store means
    // providing another TaskStore/ClassStore pair here.
    let store = Arc::new(MemoryStore::new());
    let state = AppState::spawn(
        store.clone() as Arc<dyn TaskStore>,
        store as Arc<dyn ClassStore>,
        config.roster.clone(),
    );
    let app_router = http::router(state);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;
    let actual_port = listener.local_addr()?.port();
    tracing::info!("Server running on http://{}:{actual_port}", config.host);

    let shutdown_rx = spawn_shutdown_watcher();
    axum::serve(listener, app_router)
        .with_graceful_shutdown(wait_for_watch_true(shutdown_rx))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn spawn_shutdown_watcher() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
    shutdown_rx
}

async fn wait_for_watch_true(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}
