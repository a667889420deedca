//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::World;

use crate::entities::{
    Driver, DriverClass, DriverId, FleetId, FleetVehicle, Order, OrderId, OrderStatus, ParcelSize,
    ServiceLevel, VehicleType,
};
use crate::geo::Point;

/// A standard test location used across test files: Islamabad city center.
pub const TEST_POINT: Point = Point {
    lat: 33.7294,
    lng: 73.0931,
};

/// A point roughly 5 km east of `TEST_POINT`.
pub fn test_point_offset_km(east_km: f64) -> Point {
    // At this latitude one degree of longitude is about 92.6 km.
    Point {
        lat: TEST_POINT.lat,
        lng: TEST_POINT.lng + east_km / 92.6,
    }
}

/// A published order with a medium parcel, picking up at `TEST_POINT` and
/// dropping 5 km east. `window_end` is in simulation minutes.
pub fn test_order(id: u32, window_end: u64) -> Order {
    Order {
        id: OrderId(id),
        pickup: TEST_POINT,
        drop: test_point_offset_km(5.0),
        window_start: 480,
        window_end,
        volume_l: 20.0,
        weight_kg: 5.0,
        size_class: ParcelSize::M,
        service_level: ServiceLevel::NextDay,
        base_price: 60.0,
        status: OrderStatus::Published,
        assigned_to: None,
        accepted_at: None,
        picked_up_at: None,
        delivered_at: None,
    }
}

/// A car driver at `TEST_POINT` with room for several medium orders.
pub fn test_driver(id: u32) -> Driver {
    Driver {
        id: DriverId(id),
        class: DriverClass::Yango,
        vehicle_type: VehicleType::Car,
        location: TEST_POINT,
        capacity_volume_l: 200.0,
        max_weight_kg: 80.0,
        max_detour_km: 10.0,
        speed_kmph: 30.0,
        rating: 4.5,
        max_orders: 12,
        held_orders: Vec::new(),
        total_earnings: 0.0,
    }
}

pub fn test_fleet_vehicle(id: u32) -> FleetVehicle {
    FleetVehicle {
        id: FleetId(id),
        capacity_volume_l: 500.0,
        max_weight_kg: 200.0,
        cost_per_km: 2.0,
        cost_per_min: 0.1,
        location: TEST_POINT,
        dispatched: false,
        deliveries: 0,
        accrued_cost: 0.0,
    }
}

/// Create a basic test world with the resources every handler expects.
///
/// For full scenarios, use `build_scenario` instead.
pub fn create_test_world() -> World {
    let mut world = World::new();
    world.insert_resource(crate::clock::SimulationClock::default());
    world.insert_resource(crate::state::SimulationState::default());
    world.insert_resource(crate::kpi::KpiTracker::default());
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_point_is_at_requested_distance() {
        let d = crate::geo::distance_km(TEST_POINT, test_point_offset_km(5.0));
        assert!((d - 5.0).abs() < 0.1, "unexpected offset distance {d}");
    }

    #[test]
    fn test_order_is_published_and_unassigned() {
        let order = test_order(1, 600);
        assert_eq!(order.status, OrderStatus::Published);
        assert!(order.assigned_to.is_none());
    }
}
