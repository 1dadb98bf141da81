//! The world model: sole owner of bins, trucks, hotspots, and stats.
//!
//! [`WorldState`] is a plain owned value. It is never shared directly;
//! [`LiveWorld`](crate::live::LiveWorld) wraps it behind the single-writer
//! lock, and subscribers only ever receive cloned snapshots.

use cleantrack_types::{Bin, Hotspot, LiveUpdate, Stats, Truck, WorldSnapshot};

use crate::config::WorldRules;

/// Mutable collection of every entity in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    tick: u64,
    bins: Vec<Bin>,
    trucks: Vec<Truck>,
    hotspots: Vec<Hotspot>,
    stats: Stats,
    rules: WorldRules,
}

impl WorldState {
    /// Build a world from its collections. Stats are computed immediately;
    /// `eco_points` starts at `rules.initial_eco_points`.
    pub fn new(bins: Vec<Bin>, trucks: Vec<Truck>, hotspots: Vec<Hotspot>, rules: WorldRules) -> Self {
        let mut world = Self {
            tick: 0,
            bins,
            trucks,
            hotspots,
            stats: Stats {
                eco_points: rules.initial_eco_points,
                ..Stats::default()
            },
            rules,
        };
        world.recompute_stats();
        world
    }

    /// Recompute every derived counter from the current collections.
    ///
    /// `eco_points` is left untouched; only report submission moves it.
    pub fn recompute_stats(&mut self) -> Stats {
        let full_threshold = self.rules.full_threshold;
        self.stats.total_bins = count(self.bins.len());
        self.stats.full_bins = count(
            self.bins
                .iter()
                .filter(|bin| bin.fill_level > full_threshold)
                .count(),
        );
        self.stats.active_trucks = count(self.trucks.len());
        self.stats.total_hotspots = count(self.hotspots.len());
        self.stats
    }

    /// Add `points` to the eco counter, saturating at `u64::MAX`.
    pub const fn award_eco_points(&mut self, points: u64) {
        self.stats.eco_points = self.stats.eco_points.saturating_add(points);
    }

    /// Mark one more tick as completed and return its number.
    pub const fn advance_tick(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    /// Number of completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// All bins in registry order.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Mutable access to bins for the simulator.
    pub fn bins_mut(&mut self) -> &mut [Bin] {
        &mut self.bins
    }

    /// All trucks in registry order.
    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    /// Mutable access to trucks for the simulator.
    pub fn trucks_mut(&mut self) -> &mut [Truck] {
        &mut self.trucks
    }

    /// All hotspots in submission order.
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    /// Append a hotspot. Hotspots are never removed or edited.
    pub fn push_hotspot(&mut self, hotspot: Hotspot) {
        self.hotspots.push(hotspot);
    }

    /// Stats as of the last recomputation.
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Thresholds and rewards in force.
    pub const fn rules(&self) -> WorldRules {
        self.rules
    }

    /// Full copy of the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            bins: self.bins.clone(),
            trucks: self.trucks.clone(),
            hotspots: self.hotspots.clone(),
            stats: self.stats,
        }
    }

    /// Copy of the per-tick payload: trucks, bins, and stats.
    pub fn live_update(&self) -> LiveUpdate {
        LiveUpdate {
            tick: self.tick,
            trucks: self.trucks.clone(),
            bins: self.bins.clone(),
            stats: self.stats,
        }
    }
}

/// Collection lengths are tiny; saturate rather than truncate if they
/// ever exceed `u32`.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use cleantrack_types::{BinId, BinType};

    use super::*;

    fn bin(id: u32, fill_level: u8) -> Bin {
        Bin {
            id: BinId(id),
            lat: 0.0,
            lng: 0.0,
            fill_level,
            kind: BinType::Dustbin,
            name: format!("bin-{id}"),
        }
    }

    #[test]
    fn stats_count_full_bins_strictly_above_threshold() {
        let bins = vec![bin(1, 80), bin(2, 81), bin(3, 100), bin(4, 0)];
        let world = WorldState::new(bins, Vec::new(), Vec::new(), WorldRules::default());
        let stats = world.stats();
        assert_eq!(stats.total_bins, 4);
        assert_eq!(stats.full_bins, 2);
        assert_eq!(stats.active_trucks, 0);
        assert_eq!(stats.total_hotspots, 0);
    }

    #[test]
    fn stats_match_collections_for_every_fill_level() {
        let bins: Vec<Bin> = (0..=100u8).map(|f| bin(u32::from(f), f)).collect();
        let expected_full = bins.iter().filter(|b| b.fill_level > 80).count();
        let mut world = WorldState::new(bins, Vec::new(), Vec::new(), WorldRules::default());
        let stats = world.recompute_stats();
        assert_eq!(stats.total_bins as usize, world.bins().len());
        assert_eq!(stats.full_bins as usize, expected_full);
    }

    #[test]
    fn recompute_leaves_eco_points_alone() {
        let mut world = WorldState::new(Vec::new(), Vec::new(), Vec::new(), WorldRules::default());
        world.award_eco_points(50);
        let stats = world.recompute_stats();
        assert_eq!(stats.eco_points, 1300);
    }

    #[test]
    fn recompute_tracks_fill_changes() {
        let mut world =
            WorldState::new(vec![bin(1, 10)], Vec::new(), Vec::new(), WorldRules::default());
        assert_eq!(world.stats().full_bins, 0);
        if let Some(b) = world.bins_mut().first_mut() {
            b.fill_level = 95;
        }
        assert_eq!(world.recompute_stats().full_bins, 1);
    }

    #[test]
    fn snapshot_is_a_detached_copy() {
        let mut world =
            WorldState::new(vec![bin(1, 10)], Vec::new(), Vec::new(), WorldRules::default());
        let snap = world.snapshot();
        if let Some(b) = world.bins_mut().first_mut() {
            b.fill_level = 50;
        }
        assert_eq!(snap.bins.first().map(|b| b.fill_level), Some(10));
    }
}
