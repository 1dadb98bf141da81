//! Enumeration types for the CleanTrack simulation.
//!
//! All enums serialize as lowercase strings to match the browser client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Kind of waste receptacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum BinType {
    /// General waste.
    Dustbin,
    /// Recyclables.
    Recycling,
}

/// What a collection truck is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TruckStatus {
    /// Stopped at a pickup point.
    Collecting,
    /// Driving between pickup points.
    Moving,
}

/// Severity of a reported hotspot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Severity {
    /// Minor nuisance.
    Low,
    /// Default severity for citizen reports.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
}
