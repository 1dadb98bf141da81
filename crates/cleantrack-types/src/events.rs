//! Messages exchanged over the realtime channel.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::{Hotspot, LiveUpdate, Stats, WorldSnapshot};

/// Server-to-client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum LiveEvent {
    /// Sent once to a new subscriber.
    InitialState(WorldSnapshot),
    /// Sent to everyone after each tick.
    LiveUpdate(LiveUpdate),
    /// Sent to everyone when a citizen report is accepted.
    HotspotReported(Hotspot),
    /// Sent to everyone after any stats-affecting mutation outside a tick.
    StatsUpdate(Stats),
    /// Sent to a single subscriber in answer to `requestUpdate`.
    StateUpdate(WorldSnapshot),
}

impl LiveEvent {
    /// Wire name of the event, as it appears in the `event` field.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InitialState(_) => "initialState",
            Self::LiveUpdate(_) => "liveUpdate",
            Self::HotspotReported(_) => "hotspotReported",
            Self::StatsUpdate(_) => "statsUpdate",
            Self::StateUpdate(_) => "stateUpdate",
        }
    }
}

/// Client-to-server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ClientMessage {
    /// Ask for an on-demand `stateUpdate` snapshot.
    RequestUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_update_frame_shape() {
        let event = LiveEvent::StatsUpdate(Stats {
            eco_points: 1300,
            ..Stats::default()
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "statsUpdate");
        assert_eq!(json["data"]["ecoPoints"], 1300);
        assert_eq!(event.name(), "statsUpdate");
    }

    #[test]
    fn request_update_parses_from_client_frame() {
        let msg: ClientMessage = serde_json::from_str(r#"{"event":"requestUpdate"}"#).unwrap();
        assert_eq!(msg, ClientMessage::RequestUpdate);
    }

    #[test]
    fn unknown_client_event_is_rejected() {
        let parsed = serde_json::from_str::<ClientMessage>(r#"{"event":"selfDestruct"}"#);
        assert!(parsed.is_err());
    }
}
