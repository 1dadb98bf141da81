//! Axum router construction for the live API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for the browser map client.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- `WebSocket` live event stream
/// - `GET /api/state` -- full world snapshot
/// - `POST /api/report` -- citizen hotspot report
/// - `GET /api/nearest-bin` -- nearest bin with room
///
/// CORS allows any origin, matching the demo deployment. A panicking
/// handler becomes a `500` instead of taking the connection down.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_live))
        // REST API
        .route("/api/state", get(handlers::get_state))
        .route("/api/report", post(handlers::submit_report))
        .route("/api/nearest-bin", get(handlers::nearest_bin))
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
