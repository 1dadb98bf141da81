//! Core entity structs for the CleanTrack simulation.
//!
//! Field names serialize in camelCase (`fillLevel`, `reportedBy`, ...) and
//! the `kind` fields serialize as `type`, which is the JSON contract the
//! browser map client consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BinType, Severity, TruckStatus};
use crate::ids::{BinId, HotspotId, TruckId};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A waste receptacle with a fill-level gauge.
///
/// Bins form a static registry: they are never created or destroyed after
/// startup, and only the simulator changes `fill_level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Bin {
    /// Stable registry id.
    pub id: BinId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Fill percentage, 0 to 100.
    pub fill_level: u8,
    /// Receptacle kind.
    #[serde(rename = "type")]
    pub kind: BinType,
    /// Human-readable placement name.
    pub name: String,
}

/// A collection truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Truck {
    /// Stable registry id.
    pub id: TruckId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Route label, e.g. `Route-A`.
    pub route: String,
    /// Current activity.
    pub status: TruckStatus,
    /// Movement multiplier (arbitrary units, must be positive).
    pub speed: f64,
}

/// A citizen-reported waste issue.
///
/// Created once on report submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Hotspot {
    /// Time-ordered unique id.
    pub id: HotspotId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Free-form category (`overflow`, `odour`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// How urgent the issue is.
    pub severity: Severity,
    /// Opaque submitter identifier.
    pub reported_by: String,
    /// Optional free-text description. Omitted from JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    /// When the report was accepted.
    pub reported_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Derived state
// ---------------------------------------------------------------------------

/// Aggregate counters shown on the dashboard.
///
/// Everything except `eco_points` is recomputed from the collections;
/// `eco_points` only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Stats {
    /// Number of bins in the registry.
    pub total_bins: u32,
    /// Number of bins above the full threshold.
    pub full_bins: u32,
    /// Number of trucks in service.
    pub active_trucks: u32,
    /// Number of reported hotspots.
    pub total_hotspots: u32,
    /// Accumulated citizen reward counter.
    pub eco_points: u64,
}

/// Full copy of the world, sent on connect and from `GET /api/state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Number of completed simulation ticks.
    pub tick: u64,
    /// All bins.
    pub bins: Vec<Bin>,
    /// All trucks.
    pub trucks: Vec<Truck>,
    /// All hotspots.
    pub hotspots: Vec<Hotspot>,
    /// Current stats.
    pub stats: Stats,
}

/// Per-tick payload: the two mutable collections plus stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LiveUpdate {
    /// The tick that produced this update.
    pub tick: u64,
    /// All trucks after the tick.
    pub trucks: Vec<Truck>,
    /// All bins after the tick.
    pub bins: Vec<Bin>,
    /// Stats recomputed after the tick.
    pub stats: Stats,
}

/// Answer to a nearest-bin query: the bin plus its distance from the
/// query point in coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NearestBin {
    /// The chosen bin.
    #[serde(flatten)]
    pub bin: Bin,
    /// Euclidean distance in degrees (flat-earth approximation).
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bin() -> Bin {
        Bin {
            id: BinId(1),
            lat: 12.9716,
            lng: 77.5946,
            fill_level: 30,
            kind: BinType::Dustbin,
            name: String::from("Platform 1"),
        }
    }

    #[test]
    fn bin_uses_camel_case_and_type_key() {
        let json = serde_json::to_value(sample_bin()).unwrap();
        assert_eq!(json["fillLevel"], 30);
        assert_eq!(json["type"], "dustbin");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn stats_field_names_match_dashboard() {
        let json = serde_json::to_value(Stats {
            total_bins: 8,
            full_bins: 2,
            active_trucks: 3,
            total_hotspots: 2,
            eco_points: 1250,
        })
        .unwrap();
        assert_eq!(json["totalBins"], 8);
        assert_eq!(json["fullBins"], 2);
        assert_eq!(json["activeTrucks"], 3);
        assert_eq!(json["totalHotspots"], 2);
        assert_eq!(json["ecoPoints"], 1250);
    }

    #[test]
    fn nearest_bin_flattens_bin_fields() {
        let nearest = NearestBin {
            bin: sample_bin(),
            distance: 0.5,
        };
        let json = serde_json::to_value(&nearest).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Platform 1");
        assert_eq!(json["distance"], 0.5);
    }

    fn sample_hotspot(description: Option<&str>) -> Hotspot {
        Hotspot {
            id: HotspotId::new(),
            lat: 12.9716,
            lng: 77.5946,
            kind: String::from("overflow"),
            severity: Severity::High,
            reported_by: String::from("citizen"),
            description: description.map(String::from),
            reported_at: Utc::now(),
        }
    }

    #[test]
    fn hotspot_without_description_omits_the_key() {
        let json = serde_json::to_value(sample_hotspot(None)).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["reportedBy"], "citizen");

        let back: Hotspot = serde_json::from_value(json).unwrap();
        assert_eq!(back.description, None);
    }

    #[test]
    fn hotspot_with_description_keeps_the_key() {
        let json = serde_json::to_value(sample_hotspot(Some("Bin overflowing"))).unwrap();
        assert_eq!(json["description"], "Bin overflowing");
    }
}
