//! Explicit subscriber registry and event fan-out.
//!
//! Every subscriber owns a bounded FIFO queue. [`Broadcaster::emit`] pushes
//! a copy of the event into each queue with a non-blocking `try_send`, so
//! a slow connection never stalls a tick:
//!
//! - queue full: the event is dropped for that subscriber only
//! - queue closed: the subscriber is removed from the registry
//!
//! Delivery is therefore at-most-once per event per subscriber, in
//! emission order, with no replay for late joiners.

use std::collections::BTreeMap;

use cleantrack_types::{LiveEvent, SubscriberId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default per-subscriber queue capacity.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 64;

/// Receiving half handed to a newly registered subscriber.
#[derive(Debug)]
pub struct Subscription {
    /// Registry key, used to unsubscribe.
    pub id: SubscriberId,
    /// The subscriber's event queue. The first event is always
    /// `initialState`.
    pub events: mpsc::Receiver<LiveEvent>,
}

/// Result of a single fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Subscribers whose queue accepted the event.
    pub delivered: usize,
    /// Subscribers that missed the event because their queue was full.
    pub dropped: usize,
    /// Subscribers removed because their receiver was gone.
    pub removed: usize,
}

/// Set of connected subscribers.
#[derive(Debug)]
pub struct Broadcaster {
    subscribers: BTreeMap<SubscriberId, mpsc::Sender<LiveEvent>>,
    next_id: u64,
    capacity: usize,
}

impl Broadcaster {
    /// Create an empty registry whose queues hold `capacity` events
    /// (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: BTreeMap::new(),
            next_id: 0,
            capacity: capacity.max(1),
        }
    }

    /// Register a subscriber and queue `initial` as its first event.
    pub fn register(&mut self, initial: LiveEvent) -> Subscription {
        let id = SubscriberId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let (tx, rx) = mpsc::channel(self.capacity);
        // A fresh queue always has room for one event.
        if tx.try_send(initial).is_err() {
            warn!(subscriber = %id, "failed to queue initial state");
        }
        self.subscribers.insert(id, tx);
        debug!(subscriber = %id, total = self.subscribers.len(), "subscriber registered");

        Subscription { id, events: rx }
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unregister(&mut self, id: SubscriberId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, total = self.subscribers.len(), "subscriber removed");
        }
        removed
    }

    /// Push `event` to every subscriber.
    pub fn emit(&mut self, event: &LiveEvent) -> Delivery {
        let mut delivery = Delivery::default();
        let mut closed = Vec::new();

        for (id, tx) in &self.subscribers {
            match tx.try_send(event.clone()) {
                Ok(()) => delivery.delivered = delivery.delivered.saturating_add(1),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = %id, event = event.name(), "subscriber queue full, dropping event");
                    delivery.dropped = delivery.dropped.saturating_add(1);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        for id in closed {
            self.subscribers.remove(&id);
            delivery.removed = delivery.removed.saturating_add(1);
            debug!(subscriber = %id, "subscriber gone, removed during emit");
        }

        delivery
    }

    /// Push `event` to one subscriber only. Returns `false` if the
    /// subscriber is unknown or its queue could not take the event.
    pub fn send_to(&mut self, id: SubscriberId, event: LiveEvent) -> bool {
        let Some(tx) = self.subscribers.get(&id) else {
            return false;
        };
        match tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(subscriber = %id, event = event.name(), "subscriber queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.subscribers.remove(&id);
                false
            }
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drop every subscriber. Their receivers see the queue close.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use cleantrack_types::Stats;

    use super::*;

    fn stats_event(eco_points: u64) -> LiveEvent {
        LiveEvent::StatsUpdate(Stats {
            eco_points,
            ..Stats::default()
        })
    }

    #[test]
    fn initial_event_is_queued_first() {
        let mut hub = Broadcaster::default();
        let mut sub = hub.register(stats_event(1));
        hub.emit(&stats_event(2));
        assert_eq!(sub.events.try_recv().unwrap(), stats_event(1));
        assert_eq!(sub.events.try_recv().unwrap(), stats_event(2));
    }

    #[test]
    fn events_arrive_in_emission_order() {
        let mut hub = Broadcaster::default();
        let mut sub = hub.register(stats_event(0));
        for n in 1..=10 {
            hub.emit(&stats_event(n));
        }
        let received: Vec<LiveEvent> = std::iter::from_fn(|| sub.events.try_recv().ok()).collect();
        let expected: Vec<LiveEvent> = (0..=10).map(stats_event).collect();
        assert_eq!(received, expected);
    }

    #[test]
    fn every_subscriber_gets_each_event() {
        let mut hub = Broadcaster::default();
        let mut a = hub.register(stats_event(0));
        let mut b = hub.register(stats_event(0));
        let delivery = hub.emit(&stats_event(5));
        assert_eq!(delivery.delivered, 2);
        assert_ne!(a.id, b.id);
        for sub in [&mut a, &mut b] {
            sub.events.try_recv().unwrap();
            assert_eq!(sub.events.try_recv().unwrap(), stats_event(5));
        }
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let mut hub = Broadcaster::new(2);
        let mut sub = hub.register(stats_event(0));
        let first = hub.emit(&stats_event(1));
        let second = hub.emit(&stats_event(2));
        assert_eq!(first.delivered, 1);
        assert_eq!(second.dropped, 1);
        assert_eq!(hub.len(), 1);
        assert_eq!(sub.events.try_recv().unwrap(), stats_event(0));
        assert_eq!(sub.events.try_recv().unwrap(), stats_event(1));
        assert!(sub.events.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_pruned_on_emit() {
        let mut hub = Broadcaster::default();
        let sub = hub.register(stats_event(0));
        drop(sub);
        let delivery = hub.emit(&stats_event(1));
        assert_eq!(delivery.removed, 1);
        assert!(hub.is_empty());
    }

    #[test]
    fn unregister_and_send_to() {
        let mut hub = Broadcaster::default();
        let mut a = hub.register(stats_event(0));
        let b = hub.register(stats_event(0));
        assert!(hub.send_to(a.id, stats_event(9)));
        assert!(hub.unregister(b.id));
        assert!(!hub.unregister(b.id));
        assert!(!hub.send_to(b.id, stats_event(9)));
        a.events.try_recv().unwrap();
        assert_eq!(a.events.try_recv().unwrap(), stats_event(9));
    }
}
