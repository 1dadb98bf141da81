//! Server startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_server`] which launches the HTTP + `WebSocket` server
//! on a background Tokio task so it runs concurrently with the tick loop.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the live server on a background Tokio task.
///
/// The address is checked eagerly so an obvious misconfiguration fails
/// here rather than inside the task. The server stops when `shutdown`
/// resolves.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be parsed.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state, shutdown).await {
            tracing::error!(error = %e, "live server exited with error");
        }
    });

    tracing::info!(%addr, "live server spawned on background task");
    Ok(handle)
}
