//! Single-writer handle over the world and its subscribers.
//!
//! [`LiveWorld`] owns the [`WorldState`] and the [`Broadcaster`] behind one
//! [`Mutex`]. Ticks, report submissions, subscriptions, and snapshot reads
//! each run as one critical section, and events are emitted before the lock
//! is released. Two consequences:
//!
//! - every emitted stats payload matches the collections at that instant
//! - a new subscriber's `initialState` is taken atomically with its
//!   registration, so it sees each later event exactly once and none of
//!   the earlier ones

use chrono::Utc;
use cleantrack_types::{Hotspot, LiveEvent, NearestBin, SubscriberId, WorldSnapshot};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::broadcast::{Broadcaster, Subscription};
use crate::query::{self, Report};
use crate::simulator::{Simulator, TickSummary};
use crate::world::WorldState;

/// What a report submission hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportReceipt {
    /// The hotspot that was created.
    pub hotspot: Hotspot,
    /// Eco points granted for this report.
    pub reward: u64,
}

#[derive(Debug)]
struct Inner {
    world: WorldState,
    broadcaster: Broadcaster,
}

/// Shared handle to the world. Wrap in an `Arc` to share between the tick
/// loop and request handlers.
#[derive(Debug)]
pub struct LiveWorld {
    inner: Mutex<Inner>,
}

impl LiveWorld {
    /// Take ownership of `world` and `broadcaster`.
    pub fn new(world: WorldState, broadcaster: Broadcaster) -> Self {
        Self {
            inner: Mutex::new(Inner { world, broadcaster }),
        }
    }

    /// Register a subscriber. Its queue starts with an `initialState`
    /// snapshot of the current world.
    pub async fn subscribe(&self) -> Subscription {
        let mut inner = self.inner.lock().await;
        let snapshot = inner.world.snapshot();
        let subscription = inner.broadcaster.register(LiveEvent::InitialState(snapshot));
        info!(subscriber = %subscription.id, total = inner.broadcaster.len(), "client subscribed");
        subscription
    }

    /// Remove a subscriber from the registry.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        let mut inner = self.inner.lock().await;
        if inner.broadcaster.unregister(id) {
            info!(subscriber = %id, total = inner.broadcaster.len(), "client unsubscribed");
        }
    }

    /// Run one simulator tick and emit `liveUpdate` to every subscriber.
    pub async fn tick<R: Rng + Send>(&self, simulator: &mut Simulator<R>) -> TickSummary {
        let mut inner = self.inner.lock().await;
        let Inner { world, broadcaster } = &mut *inner;
        let summary = simulator.tick(world);
        let delivery = broadcaster.emit(&LiveEvent::LiveUpdate(world.live_update()));
        debug!(
            tick = summary.tick,
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            "liveUpdate emitted"
        );
        summary
    }

    /// Record a citizen report, then emit `hotspotReported` followed by
    /// `statsUpdate` to every subscriber.
    pub async fn submit_report(&self, report: Report) -> ReportReceipt {
        let mut inner = self.inner.lock().await;
        let Inner { world, broadcaster } = &mut *inner;

        let hotspot = query::submit_report(world, report, Utc::now());
        let stats = world.stats();
        broadcaster.emit(&LiveEvent::HotspotReported(hotspot.clone()));
        broadcaster.emit(&LiveEvent::StatsUpdate(stats));

        info!(
            hotspot = %hotspot.id,
            kind = %hotspot.kind,
            eco_points = stats.eco_points,
            "hotspot reported"
        );

        ReportReceipt {
            hotspot,
            reward: world.rules().report_reward,
        }
    }

    /// Closest bin below the availability threshold, if any.
    pub async fn nearest_available_bin(&self, lat: f64, lng: f64) -> Option<NearestBin> {
        let inner = self.inner.lock().await;
        query::nearest_available_bin(&inner.world, lat, lng)
    }

    /// Full snapshot, with stats recomputed first.
    pub async fn snapshot(&self) -> WorldSnapshot {
        let mut inner = self.inner.lock().await;
        inner.world.recompute_stats();
        inner.world.snapshot()
    }

    /// Queue an on-demand `stateUpdate` for one subscriber.
    pub async fn request_update(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.lock().await;
        let Inner { world, broadcaster } = &mut *inner;
        world.recompute_stats();
        broadcaster.send_to(id, LiveEvent::StateUpdate(world.snapshot()))
    }

    /// Number of connected subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.broadcaster.len()
    }

    /// Drop every subscriber; their queues close.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        let count = inner.broadcaster.len();
        inner.broadcaster.clear();
        info!(subscribers = count, "live world shut down");
    }
}
