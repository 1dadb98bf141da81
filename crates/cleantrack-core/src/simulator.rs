//! Fixed-interval random-walk simulator.
//!
//! Each tick:
//!
//! 1. **Trucks** -- every truck moves by a uniform random offset scaled by
//!    its speed, is clamped into the configured [`Bounds`], and with a small
//!    probability re-rolls its status.
//! 2. **Bins** -- every bin's fill level drifts by a uniform integer in
//!    `[fill_drift_min, fill_drift_max]`, clamped to `0..=100`.
//! 3. **Stats** -- recomputed from the collections.
//!
//! A truck with non-finite coordinates or a non-positive speed is logged
//! and does not take a random step; the rest of the tick still runs. Its
//! position is still clamped unless it is NaN. Trucks never empty bins.
//!
//! The random source is a type parameter so tests can drive the simulator
//! with a seeded [`StdRng`].

use cleantrack_types::{Bin, Truck, TruckId, TruckStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::{Bounds, ConfigError, SimulationConfig};
use crate::world::WorldState;

/// A single entity that could not be advanced this tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntityFault {
    /// The truck's position is NaN or infinite.
    #[error("truck {truck_id} has non-finite position ({lat}, {lng})")]
    NonFinitePosition {
        /// The offending truck.
        truck_id: TruckId,
        /// Stored latitude.
        lat: f64,
        /// Stored longitude.
        lng: f64,
    },

    /// The truck's speed is not a positive finite number.
    #[error("truck {truck_id} has invalid speed {speed}")]
    InvalidSpeed {
        /// The offending truck.
        truck_id: TruckId,
        /// Stored speed.
        speed: f64,
    },
}

/// Outcome of one simulator tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that just completed.
    pub tick: u64,
    /// Trucks that were advanced.
    pub trucks_moved: u32,
    /// Trucks whose status changed this tick.
    pub status_changes: u32,
    /// Bins whose fill level was re-drawn.
    pub bins_updated: u32,
    /// Entities skipped because they were malformed.
    pub faults: Vec<EntityFault>,
}

/// Advances truck positions and bin fill levels.
#[derive(Debug)]
pub struct Simulator<R = StdRng> {
    config: SimulationConfig,
    rng: R,
}

impl Simulator<StdRng> {
    /// Create a simulator seeded from `config.seed`, or from the OS when
    /// no seed is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is out of range.
    pub fn from_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulator<R> {
    /// Create a simulator with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is out of range.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// The configuration in force.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one tick against `world` and recompute its stats.
    pub fn tick(&mut self, world: &mut WorldState) -> TickSummary {
        let mut trucks_moved: u32 = 0;
        let mut status_changes: u32 = 0;
        let mut faults = Vec::new();

        for truck in world.trucks_mut() {
            let before = truck.status;
            match self.step_truck(truck) {
                Ok(()) => {
                    trucks_moved = trucks_moved.saturating_add(1);
                    if truck.status != before {
                        status_changes = status_changes.saturating_add(1);
                    }
                }
                Err(fault) => {
                    warn!(error = %fault, "skipping truck this tick");
                    faults.push(fault);
                }
            }
        }

        let mut bins_updated: u32 = 0;
        for bin in world.bins_mut() {
            self.step_bin(bin);
            bins_updated = bins_updated.saturating_add(1);
        }

        let tick = world.advance_tick();
        let stats = world.recompute_stats();

        debug!(
            tick,
            trucks_moved,
            status_changes,
            bins_updated,
            full_bins = stats.full_bins,
            faults = faults.len(),
            "tick complete"
        );

        TickSummary {
            tick,
            trucks_moved,
            status_changes,
            bins_updated,
            faults,
        }
    }

    /// Move one truck and maybe re-roll its status.
    ///
    /// # Errors
    ///
    /// Returns an [`EntityFault`] if the truck's position or speed is
    /// malformed. The random step is skipped, but a position that is not
    /// NaN is still clamped into the bounds so the truck never stays
    /// outside them.
    pub fn step_truck(&mut self, truck: &mut Truck) -> Result<(), EntityFault> {
        if truck.lat.is_nan() || truck.lng.is_nan() {
            return Err(EntityFault::NonFinitePosition {
                truck_id: truck.id,
                lat: truck.lat,
                lng: truck.lng,
            });
        }

        let fault = if !truck.lat.is_finite() || !truck.lng.is_finite() {
            Some(EntityFault::NonFinitePosition {
                truck_id: truck.id,
                lat: truck.lat,
                lng: truck.lng,
            })
        } else if !truck.speed.is_finite() || truck.speed <= 0.0 {
            Some(EntityFault::InvalidSpeed {
                truck_id: truck.id,
                speed: truck.speed,
            })
        } else {
            None
        };
        if let Some(fault) = fault {
            let (lat, lng) = clamp_to(&self.config.bounds, truck.lat, truck.lng);
            truck.lat = lat;
            truck.lng = lng;
            return Err(fault);
        }

        let step = self.config.max_step;
        let lat_change = self.rng.random_range(-step..=step) * truck.speed;
        let lng_change = self.rng.random_range(-step..=step) * truck.speed;
        let (lat, lng) = clamp_to(&self.config.bounds, truck.lat + lat_change, truck.lng + lng_change);
        truck.lat = lat;
        truck.lng = lng;

        if self.rng.random_bool(self.config.status_flip_probability) {
            truck.status = if self.rng.random_bool(0.5) {
                TruckStatus::Collecting
            } else {
                TruckStatus::Moving
            };
        }
        Ok(())
    }

    /// Drift one bin's fill level, clamped to `0..=100`.
    pub fn step_bin(&mut self, bin: &mut Bin) {
        let drift = self
            .rng
            .random_range(self.config.fill_drift_min..=self.config.fill_drift_max);
        let next = i32::from(bin.fill_level).saturating_add(drift).clamp(0, 100);
        bin.fill_level = u8::try_from(next).unwrap_or(100);
    }
}

/// Clamp a non-NaN point into `bounds`. Infinite coordinates land on an
/// edge.
fn clamp_to(bounds: &Bounds, lat: f64, lng: f64) -> (f64, f64) {
    (
        lat.clamp(bounds.min_lat, bounds.max_lat),
        lng.clamp(bounds.min_lng, bounds.max_lng),
    )
}
