//! `WebSocket` handler for the live event stream.
//!
//! Clients connect to `GET /ws`. The connection is registered as a
//! subscriber, receives `initialState` first, then every broadcast event
//! in emission order as JSON text frames `{"event": ..., "data": ...}`.
//! Sending `{"event": "requestUpdate"}` queues a `stateUpdate` snapshot
//! for this connection only.
//!
//! This task is the only writer to its socket, and it drains a single FIFO
//! queue, so per-connection ordering is preserved.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use cleantrack_core::Subscription;
use cleantrack_types::{ClientMessage, SubscriberId};
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming live events.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_live(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: subscribe, forward queued events,
/// answer `requestUpdate`, and unsubscribe on exit.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let Subscription { id, mut events } = state.live.subscribe().await;
    debug!(subscriber = %id, "WebSocket client connected");

    loop {
        tokio::select! {
            // Next queued event for this subscriber.
            event = events.recv() => {
                let Some(event) = event else {
                    debug!(subscriber = %id, "subscriber queue closed, shutting down WebSocket");
                    break;
                };
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!(subscriber = %id, event = event.name(), "failed to serialize event: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(subscriber = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Client frames.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_text(&state, id, text.as_str()).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(subscriber = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(subscriber = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(subscriber = %id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Binary and pong frames are ignored.
                    }
                }
            }
        }
    }

    state.live.unsubscribe(id).await;
}

async fn handle_client_text(state: &AppState, id: SubscriberId, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::RequestUpdate) => {
            if !state.live.request_update(id).await {
                debug!(subscriber = %id, "stateUpdate not queued");
            }
        }
        Err(e) => debug!(subscriber = %id, "ignoring unrecognised client frame: {e}"),
    }
}
