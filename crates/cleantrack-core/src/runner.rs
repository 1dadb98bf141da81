//! Fixed-interval tick loop.
//!
//! [`run_simulation`] drives [`LiveWorld::tick`] on a timer until the
//! optional tick limit is reached or the caller drops the future. The
//! first tick fires one full interval after start. Missed ticks are not
//! replayed in a burst; the schedule simply slides.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::live::LiveWorld;
use crate::simulator::Simulator;

/// Why the tick loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
}

/// Result of a bounded simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Why the loop stopped.
    pub end_reason: SimulationEndReason,
    /// Ticks executed by this run.
    pub total_ticks: u64,
}

/// Run ticks every `interval`.
///
/// With `max_ticks = None` this never returns; cancel it by dropping the
/// future (e.g. from a `tokio::select!` against a shutdown signal).
pub async fn run_simulation<R: Rng + Send>(
    live: &LiveWorld,
    simulator: &mut Simulator<R>,
    interval: Duration,
    max_ticks: Option<u64>,
) -> SimulationResult {
    let interval = interval.max(Duration::from_millis(1));
    let mut timer = time::interval_at(Instant::now() + interval, interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut total_ticks: u64 = 0;

    info!(
        interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        max_ticks,
        "simulation starting"
    );

    loop {
        if max_ticks.is_some_and(|max| total_ticks >= max) {
            info!(total_ticks, "tick limit reached");
            return SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                total_ticks,
            };
        }

        timer.tick().await;
        let summary = live.tick(simulator).await;
        total_ticks = total_ticks.saturating_add(1);

        if !summary.faults.is_empty() {
            warn!(
                tick = summary.tick,
                faults = summary.faults.len(),
                "tick completed with skipped entities"
            );
        }
    }
}
