//! studyplan-server: HTTP API over the task store and the planner.
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /tasks`, `POST /tasks`
//! - `GET  /plan[?today=YYYY-MM-DD]`

pub mod error;
pub mod handlers;
pub mod payload;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/plan", get(handlers::get_plan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received Ctrl+C, shutting down");
        })
        .await
        .context("http server")?;

    Ok(())
}
