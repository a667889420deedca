//! Core entity model: orders, drivers, and the backup fleet.
//!
//! These are plain value types. The only behavior they carry is
//! invariant-preserving mutators: order status transitions follow a closed
//! table, and a driver never holds more order ids than `max_orders`.

use std::fmt;

use crate::geo::{self, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct OrderId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct DriverId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct FleetId(pub u32);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver_{}", self.0)
    }
}

impl fmt::Display for FleetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fleet_{}", self.0)
    }
}

/// Parcel size classes, ordered smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum ParcelSize {
    Xs,
    S,
    M,
    L,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ServiceLevel {
    SameDay,
    NextDay,
    Flex,
}

/// Who an accepted order is assigned to: a matched driver or a backup
/// fleet vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Courier {
    Driver(DriverId),
    Fleet(FleetId),
}

/// Order lifecycle states. Transitions are monotonic along
/// Published -> Accepted -> PickedUp -> Delivered; Expired and Cancelled
/// are terminal and reachable only before pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum OrderStatus {
    Published,
    Accepted,
    PickedUp,
    Delivered,
    Expired,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Expired | Self::Cancelled)
    }

    /// An order counts as matched once a courier has accepted it.
    pub fn is_matched(self) -> bool {
        matches!(self, Self::Accepted | Self::PickedUp | Self::Delivered)
    }

    /// The closed transition table. Fleet dispatches deliver straight from
    /// Accepted (there is no pickup leg event for the backup fleet), which
    /// is why Accepted -> Delivered is legal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Published, Accepted)
                | (Published, Expired)
                | (Published, Cancelled)
                | (Accepted, PickedUp)
                | (Accepted, Delivered)
                | (Accepted, Cancelled)
                | (PickedUp, Delivered)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum VehicleType {
    Bus,
    Motorbike,
    Car,
    Truck,
}

impl VehicleType {
    /// Largest parcel size class this vehicle can carry.
    pub fn max_parcel_size(self) -> ParcelSize {
        match self {
            Self::Motorbike => ParcelSize::M,
            Self::Car => ParcelSize::L,
            Self::Bus => ParcelSize::L,
            Self::Truck => ParcelSize::Xl,
        }
    }

    /// CO2 emissions in kg per kilometer. Bus deliveries ride along an
    /// existing route, so only the marginal share is attributed.
    pub fn emissions_kg_per_km(self) -> f64 {
        match self {
            Self::Bus => 0.05,
            Self::Motorbike => 0.08,
            Self::Car => 0.12,
            Self::Truck => 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum DriverClass {
    Metro,
    Yango,
    Shahzore,
}

/// A customer delivery order. Timestamps are simulation minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub pickup: Point,
    pub drop: Point,
    pub window_start: u64,
    pub window_end: u64,
    pub volume_l: f64,
    pub weight_kg: f64,
    pub size_class: ParcelSize,
    pub service_level: ServiceLevel,
    pub base_price: f64,
    pub status: OrderStatus,
    pub assigned_to: Option<Courier>,
    pub accepted_at: Option<u64>,
    pub picked_up_at: Option<u64>,
    pub delivered_at: Option<u64>,
}

impl Order {
    /// Direct pickup-to-drop distance in kilometers.
    pub fn direct_distance_km(&self) -> f64 {
        geo::distance_km(self.pickup, self.drop)
    }

    /// An order expires once its delivery window has closed.
    pub fn is_expired(&self, now: u64) -> bool {
        self.window_end < now
    }

    fn transition(&mut self, next: OrderStatus) {
        if !self.status.can_transition_to(next) {
            panic!(
                "illegal status transition {:?} -> {:?} for {}",
                self.status, next, self.id
            );
        }
        self.status = next;
    }

    pub fn accept(&mut self, courier: Courier, now: u64) {
        self.transition(OrderStatus::Accepted);
        self.assigned_to = Some(courier);
        self.accepted_at = Some(now);
    }

    pub fn pick_up(&mut self, now: u64) {
        self.transition(OrderStatus::PickedUp);
        self.picked_up_at = Some(now);
    }

    pub fn deliver(&mut self, now: u64) {
        self.transition(OrderStatus::Delivered);
        self.delivered_at = Some(now);
    }

    pub fn expire(&mut self) {
        self.transition(OrderStatus::Expired);
    }

    pub fn cancel(&mut self) {
        self.transition(OrderStatus::Cancelled);
    }
}

/// A transport driver participating in the hitchhiking pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub id: DriverId,
    pub class: DriverClass,
    pub vehicle_type: VehicleType,
    pub location: Point,
    pub capacity_volume_l: f64,
    pub max_weight_kg: f64,
    pub max_detour_km: f64,
    pub speed_kmph: f64,
    pub rating: f64,
    pub max_orders: usize,
    pub held_orders: Vec<OrderId>,
    pub total_earnings: f64,
}

impl Driver {
    /// Whether the driver can take on at least one more order.
    pub fn has_capacity_slot(&self) -> bool {
        self.held_orders.len() < self.max_orders
    }

    pub fn accept_order(&mut self, order: OrderId) {
        if !self.has_capacity_slot() {
            panic!("{} accepted {order} beyond max_orders", self.id);
        }
        self.held_orders.push(order);
    }

    /// Releases a completed or cancelled order and credits earnings.
    pub fn release_order(&mut self, order: OrderId, earnings: f64) {
        self.held_orders.retain(|held| *held != order);
        self.total_earnings += earnings;
    }
}

/// A dedicated backup vehicle, dispatched only for orders about to miss
/// their deadline. Not part of the regular matching pool.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetVehicle {
    pub id: FleetId,
    pub capacity_volume_l: f64,
    pub max_weight_kg: f64,
    pub cost_per_km: f64,
    pub cost_per_min: f64,
    pub location: Point,
    pub dispatched: bool,
    pub deliveries: u32,
    pub accrued_cost: f64,
}

impl FleetVehicle {
    /// Capacity-only check; fleet dispatch has no detour constraint.
    pub fn can_handle(&self, order: &Order) -> bool {
        !self.dispatched
            && order.volume_l <= self.capacity_volume_l
            && order.weight_kg <= self.max_weight_kg
    }

    pub fn delivery_cost(&self, distance_km: f64, time_minutes: f64) -> f64 {
        distance_km * self.cost_per_km + time_minutes * self.cost_per_min
    }

    pub fn dispatch(&mut self, cost: f64) {
        self.dispatched = true;
        self.accrued_cost += cost;
    }

    pub fn return_to_base(&mut self) {
        self.dispatched = false;
        self.deliveries += 1;
    }
}
