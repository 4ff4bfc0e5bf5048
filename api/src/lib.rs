use std::{env, net::SocketAddr, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::{
        chat::chat_route::chat,
        health_route::{health, health_backends},
        index_route::index,
    },
};

const DEFAULT_PORT: &str = "8080";

/// Builds the HTTP surface over a ready [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/api/health/backends", get(health_backends))
        .with_state(Arc::new(state))
}

/// Wires the pipeline from the environment and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let state = AppState::from_env().await?;
    let addr = listen_address()?;

    // Bind to address
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, service = %state.service_name, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// `API_ADDRESS`, else `0.0.0.0:$PORT` (port 8080 by default).
fn listen_address() -> AppResult<SocketAddr> {
    let raw = env::var("API_ADDRESS")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
            format!("0.0.0.0:{}", port.trim())
        });
    raw.trim().parse().map_err(|_| AppError::Address(raw))
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal; stopping now");
    }
}
