//! Live API server for the CleanTrack simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) streaming `initialState`,
//!   `liveUpdate`, `hotspotReported`, `statsUpdate`, and on-demand
//!   `stateUpdate` events
//! - **REST endpoints** for the full snapshot, citizen reports, and
//!   nearest-bin lookup
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Every handler goes through the shared
//! [`LiveWorld`](cleantrack_core::LiveWorld) handle, which serializes
//! requests with the tick loop. `WebSocket` clients are explicit
//! subscribers in its registry, each with its own FIFO queue.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
