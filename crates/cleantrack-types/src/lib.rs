//! Shared type definitions for the CleanTrack simulation.
//!
//! This crate is the single source of truth for the data exchanged between
//! the simulation server and the browser map client. Types flow to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for bins, trucks, hotspots, subscribers
//! - [`enums`] -- Bin kinds, truck status, hotspot severity
//! - [`structs`] -- Entities, stats, snapshots, nearest-bin answers
//! - [`events`] -- Realtime channel messages

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BinType, Severity, TruckStatus};
pub use events::{ClientMessage, LiveEvent};
pub use ids::{BinId, HotspotId, SubscriberId, TruckId};
pub use structs::{Bin, Hotspot, LiveUpdate, NearestBin, Stats, Truck, WorldSnapshot};
