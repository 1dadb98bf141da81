//! Type-safe identifier wrappers.
//!
//! Bins and trucks belong to a static registry and keep small numeric ids
//! that never change. Hotspots are created at runtime and use UUID v7,
//! which is time-ordered and carries random bits, so ids minted back to
//! back inside the same millisecond still never collide.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around a stable numeric registry id.
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

    };
}

define_numeric_id! {
    /// Unique identifier for a waste bin.
    BinId
}

define_numeric_id! {
    /// Unique identifier for a collection truck.
    TruckId
}

/// Unique identifier for a citizen-reported hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HotspotId(pub Uuid);

#[allow(clippy::new_without_default)]
impl HotspotId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl core::fmt::Display for HotspotId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a live-channel subscriber (one per connection).
///
/// Assigned sequentially by the broadcaster; never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub u64);

impl core::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn hotspot_ids_minted_back_to_back_are_distinct() {
        let ids: BTreeSet<HotspotId> = (0..1_000).map(|_| HotspotId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn hotspot_ids_are_time_ordered() {
        let first = HotspotId::new();
        let second = HotspotId::new();
        assert!(first < second);
    }

    #[test]
    fn numeric_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&BinId(7)).unwrap();
        assert_eq!(json, "7");
        let back: TruckId = serde_json::from_str("3").unwrap();
        assert_eq!(back, TruckId(3));
    }
}
