//! Default starting world: 8 bins, 3 trucks, and 2 hotspots around the
//! city railway station.

use chrono::{DateTime, Utc};
use cleantrack_types::{
    Bin, BinId, BinType, Hotspot, HotspotId, Severity, Truck, TruckId, TruckStatus,
};

use crate::config::WorldRules;
use crate::world::WorldState;

/// Helper to build a [`Bin`].
fn bin(id: u32, lat: f64, lng: f64, fill_level: u8, kind: BinType, name: &str) -> Bin {
    Bin {
        id: BinId(id),
        lat,
        lng,
        fill_level,
        kind,
        name: name.to_owned(),
    }
}

/// Helper to build a [`Truck`].
fn truck(id: u32, lat: f64, lng: f64, route: &str, status: TruckStatus, speed: f64) -> Truck {
    Truck {
        id: TruckId(id),
        lat,
        lng,
        route: route.to_owned(),
        status,
        speed,
    }
}

/// The 8 seed bins.
pub fn seed_bins() -> Vec<Bin> {
    use BinType::{Dustbin, Recycling};
    vec![
        bin(1, 12.9716, 77.5946, 30, Dustbin, "City Railway Station - Platform 1"),
        bin(2, 12.9756, 77.5946, 60, Recycling, "Recycling Center - Main Exit"),
        bin(3, 12.9726, 77.5986, 85, Dustbin, "Food Court Area"),
        bin(4, 12.9696, 77.5926, 15, Dustbin, "Parking Area"),
        bin(5, 12.9776, 77.5966, 70, Recycling, "Shopping Complex"),
        bin(6, 12.9746, 77.5906, 45, Dustbin, "Bus Stop Junction"),
        bin(7, 12.9706, 77.5966, 90, Dustbin, "Market Street"),
        bin(8, 12.9786, 77.5926, 25, Recycling, "Office Complex"),
    ]
}

/// The 3 seed trucks.
pub fn seed_trucks() -> Vec<Truck> {
    use TruckStatus::{Collecting, Moving};
    vec![
        truck(1, 12.9736, 77.5936, "Route-A", Collecting, 2.0),
        truck(2, 12.9766, 77.5956, "Route-B", Moving, 3.0),
        truck(3, 12.9696, 77.5976, "Route-C", Collecting, 1.5),
    ]
}

/// The 2 seed hotspots, stamped with `reported_at`.
pub fn seed_hotspots(reported_at: DateTime<Utc>) -> Vec<Hotspot> {
    vec![
        Hotspot {
            id: HotspotId::new(),
            lat: 12.9726,
            lng: 77.5976,
            kind: String::from("overflow"),
            severity: Severity::High,
            reported_by: String::from("citizen_001"),
            description: None,
            reported_at,
        },
        Hotspot {
            id: HotspotId::new(),
            lat: 12.9756,
            lng: 77.5916,
            kind: String::from("odour"),
            severity: Severity::Medium,
            reported_by: String::from("citizen_002"),
            description: None,
            reported_at,
        },
    ]
}

/// Build the starting world under the given rules.
pub fn create_seed_world(rules: WorldRules) -> WorldState {
    WorldState::new(seed_bins(), seed_trucks(), seed_hotspots(Utc::now()), rules)
}
