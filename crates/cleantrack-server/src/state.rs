//! Shared application state for the live API server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cleantrack_core::LiveWorld;

/// Shared state injected via Axum's `State` extractor.
///
/// Handlers never touch the world directly; every read and write goes
/// through the [`LiveWorld`] handle so it is serialized with the tick loop.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The single-writer world handle.
    pub live: Arc<LiveWorld>,
    /// When the server state was created.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wrap an existing world handle.
    pub fn new(live: Arc<LiveWorld>) -> Self {
        Self {
            live,
            started_at: Utc::now(),
        }
    }
}
