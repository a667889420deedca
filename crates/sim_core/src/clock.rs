//! Simulation clock and event scheduler.
//!
//! Events live in a binary min-heap keyed by `(timestamp, seq)`. The
//! insertion sequence number gives equal-timestamp events exact FIFO order;
//! matching results depend on that ordering, so it must never regress to
//! heap-internal arbitrary order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;

use crate::entities::{Courier, DriverId, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelTarget {
    Order(OrderId),
    Driver(DriverId),
}

/// Tagged union of event kinds with their payloads. Events are immutable
/// once scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    OrderArrival(OrderId),
    DriverArrival(DriverId),
    Tick(u32),
    Cancellation(CancelTarget),
    OrderPickup {
        order: OrderId,
        driver: DriverId,
    },
    /// Carries the route distance and time actually driven, so the handler
    /// can credit wages and aggregates without reconstructing the route.
    DeliveryComplete {
        order: OrderId,
        courier: Courier,
        distance_km: f64,
        time_minutes: f64,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Simulation minute at which the event fires.
    pub timestamp: u64,
    /// Insertion sequence number, assigned by the clock. FIFO tie-break.
    pub seq: u64,
    pub kind: EventKind,
}

// Equality and ordering both use only the `(timestamp, seq)` key, so the
// impls agree; payloads are compared through `EventKind` where needed.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.seq == other.seq
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest (timestamp, seq) first.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being dispatched through the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, timestamp: u64, kind: EventKind) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            seq,
            kind,
        });
    }

    pub fn schedule_in(&mut self, delta_minutes: u64, kind: EventKind) {
        self.schedule(self.now + delta_minutes, kind);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}
