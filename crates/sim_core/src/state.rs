//! Central simulation state: entity stores, derived id sets, and the
//! matching and fleet-dispatch orchestration that ticks run.
//!
//! All stores are `BTreeMap`/`BTreeSet` so iteration order is fixed by id
//! and runs are reproducible. Lookups by id panic when the id is unknown:
//! an event referencing a missing entity means the engine is corrupt, and
//! continuing would silently skew every KPI after it.

use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::prelude::Resource;

use crate::clock::{EventKind, SimulationClock};
use crate::entities::{
    Courier, Driver, DriverId, FleetId, FleetVehicle, Order, OrderId, OrderStatus,
};
use crate::geo;
use crate::matching::{greedy_matching, is_feasible, DistanceTimeCost, DriverLoad, MatchParams};

/// Speed assumed for backup fleet vehicles, km/h.
pub const FLEET_SPEED_KMPH: f64 = 30.0;

#[derive(Debug, Resource)]
pub struct SimulationState {
    pub orders: BTreeMap<OrderId, Order>,
    pub drivers: BTreeMap<DriverId, Driver>,
    pub fleet: BTreeMap<FleetId, FleetVehicle>,

    /// Published orders not yet assigned to any courier.
    pub unassigned_orders: BTreeSet<OrderId>,
    /// Orders accepted by a courier and not yet in a terminal state.
    pub assigned_orders: BTreeSet<OrderId>,
    /// Drivers with at least one free order slot.
    pub available_drivers: BTreeSet<DriverId>,
    /// Drivers who cancelled for the day. They finish deliveries already
    /// on board but never rejoin the matching pool.
    pub retired_drivers: BTreeSet<DriverId>,

    pub tick_number: u32,
    pub completed_deliveries: u32,
    pub fleet_dispatches: u32,
    pub total_distance_km: f64,
    pub total_delivery_time_min: f64,
    pub total_emissions_kg: f64,

    // Policy knobs, copied out of the config at scenario build time.
    pub match_params: MatchParams,
    pub base_price_multiplier: f64,
    pub overflow_margin_min: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            orders: BTreeMap::new(),
            drivers: BTreeMap::new(),
            fleet: BTreeMap::new(),
            unassigned_orders: BTreeSet::new(),
            assigned_orders: BTreeSet::new(),
            available_drivers: BTreeSet::new(),
            retired_drivers: BTreeSet::new(),
            tick_number: 0,
            completed_deliveries: 0,
            fleet_dispatches: 0,
            total_distance_km: 0.0,
            total_delivery_time_min: 0.0,
            total_emissions_kg: 0.0,
            match_params: MatchParams::default(),
            base_price_multiplier: 1.0,
            overflow_margin_min: 30,
        }
    }
}

impl SimulationState {
    /// Registers a newly arrived order. The configured price multiplier is
    /// applied once, here.
    pub fn add_order(&mut self, mut order: Order) {
        debug_assert_eq!(order.status, OrderStatus::Published);
        order.base_price *= self.base_price_multiplier;
        self.unassigned_orders.insert(order.id);
        self.orders.insert(order.id, order);
    }

    pub fn add_driver(&mut self, driver: Driver) {
        if driver.has_capacity_slot() {
            self.available_drivers.insert(driver.id);
        }
        self.drivers.insert(driver.id, driver);
    }

    pub fn add_fleet_vehicle(&mut self, vehicle: FleetVehicle) {
        self.fleet.insert(vehicle.id, vehicle);
    }

    pub fn order_mut(&mut self, id: OrderId) -> &mut Order {
        match self.orders.get_mut(&id) {
            Some(order) => order,
            None => panic!("unknown order {id}"),
        }
    }

    pub fn driver_mut(&mut self, id: DriverId) -> &mut Driver {
        match self.drivers.get_mut(&id) {
            Some(driver) => driver,
            None => panic!("unknown driver {id}"),
        }
    }

    pub fn fleet_mut(&mut self, id: FleetId) -> &mut FleetVehicle {
        match self.fleet.get_mut(&id) {
            Some(vehicle) => vehicle,
            None => panic!("unknown fleet vehicle {id}"),
        }
    }

    /// Committed load of a driver, summed over its held orders.
    pub fn driver_load(&self, id: DriverId) -> DriverLoad {
        let driver = &self.drivers[&id];
        let mut load = DriverLoad {
            held_count: driver.held_orders.len(),
            ..Default::default()
        };
        for order_id in &driver.held_orders {
            let order = &self.orders[order_id];
            load.volume_l += order.volume_l;
            load.weight_kg += order.weight_kg;
        }
        load
    }

    /// Expires every unassigned order whose window has closed. Returns how
    /// many expired.
    pub fn expire_overdue_orders(&mut self, now: u64) -> u32 {
        let overdue: Vec<OrderId> = self
            .unassigned_orders
            .iter()
            .copied()
            .filter(|id| self.orders[id].is_expired(now))
            .collect();
        for id in &overdue {
            self.order_mut(*id).expire();
            self.unassigned_orders.remove(id);
        }
        overdue.len() as u32
    }

    /// Runs one greedy matching pass over current unassigned orders and
    /// available drivers, then commits the assignments that still hold
    /// against committed state. Returns the number of commits.
    ///
    /// Each commit transitions the order to Accepted, books it onto the
    /// driver, and schedules the pickup event at the driver's travel time
    /// to the pickup point.
    pub fn trigger_matching(&mut self, now: u64, clock: &mut SimulationClock) -> usize {
        let orders: Vec<&Order> = self
            .unassigned_orders
            .iter()
            .map(|id| &self.orders[id])
            .filter(|order| order.status == OrderStatus::Published && !order.is_expired(now))
            .collect();
        let loads: BTreeMap<DriverId, DriverLoad> = self
            .available_drivers
            .iter()
            .map(|id| (*id, self.driver_load(*id)))
            .collect();
        let drivers: Vec<(&Driver, DriverLoad)> = self
            .available_drivers
            .iter()
            .map(|id| (&self.drivers[id], loads[id]))
            .collect();

        let assignments = greedy_matching(
            &orders,
            &drivers,
            now,
            self.match_params,
            &DistanceTimeCost::default(),
        );

        let mut committed = 0;
        for assignment in assignments {
            // Re-validate against committed state: earlier commits in this
            // loop may have consumed the driver's capacity or detour room.
            let order = &self.orders[&assignment.order];
            let driver = &self.drivers[&assignment.driver];
            if order.status != OrderStatus::Published {
                continue;
            }
            let load = self.driver_load(assignment.driver);
            if !is_feasible(order, driver, load, driver.location, 0.0, now) {
                continue;
            }

            let approach_minutes = geo::travel_time_minutes_ceil(
                geo::distance_km(driver.location, order.pickup),
                driver.speed_kmph,
            );
            clock.schedule(
                now + approach_minutes,
                EventKind::OrderPickup {
                    order: assignment.order,
                    driver: assignment.driver,
                },
            );

            self.order_mut(assignment.order)
                .accept(Courier::Driver(assignment.driver), now);
            self.unassigned_orders.remove(&assignment.order);
            self.assigned_orders.insert(assignment.order);

            let driver = self.driver_mut(assignment.driver);
            driver.accept_order(assignment.order);
            if !driver.has_capacity_slot() {
                self.available_drivers.remove(&assignment.driver);
            }
            committed += 1;
        }
        committed
    }

    /// Hands orders that are about to miss their deadline to the backup
    /// fleet. Returns the number of dispatches.
    pub fn dispatch_overflow_fleet(&mut self, now: u64, clock: &mut SimulationClock) -> u32 {
        let at_risk: Vec<OrderId> = self
            .unassigned_orders
            .iter()
            .copied()
            .filter(|id| {
                let order = &self.orders[id];
                !order.is_expired(now) && order.window_end - now <= self.overflow_margin_min
            })
            .collect();

        let mut dispatched = 0;
        for order_id in at_risk {
            let order = &self.orders[&order_id];
            let Some(fleet_id) = self
                .fleet
                .values()
                .find(|vehicle| vehicle.can_handle(order))
                .map(|vehicle| vehicle.id)
            else {
                continue;
            };

            let vehicle = &self.fleet[&fleet_id];
            let distance_km =
                geo::distance_km(vehicle.location, order.pickup) + order.direct_distance_km();
            let time_minutes = geo::travel_time_minutes(distance_km, FLEET_SPEED_KMPH);
            let cost = vehicle.delivery_cost(distance_km, time_minutes);

            clock.schedule(
                now + time_minutes.ceil() as u64,
                EventKind::DeliveryComplete {
                    order: order_id,
                    courier: Courier::Fleet(fleet_id),
                    distance_km,
                    time_minutes,
                },
            );

            self.order_mut(order_id).accept(Courier::Fleet(fleet_id), now);
            self.unassigned_orders.remove(&order_id);
            self.assigned_orders.insert(order_id);
            self.fleet_mut(fleet_id).dispatch(cost);
            self.fleet_dispatches += 1;
            dispatched += 1;
        }
        dispatched
    }

    /// One-line tick summary at debug level.
    pub fn log_tick(&self, now: u64) {
        log::debug!(
            "t={now} tick {}: {} unassigned, {} assigned, {} drivers available, \
             {} deliveries done",
            self.tick_number,
            self.unassigned_orders.len(),
            self.assigned_orders.len(),
            self.available_drivers.len(),
            self.completed_deliveries
        );
    }

    /// Tick-boundary consistency checks, debug builds only.
    pub fn debug_check_invariants(&self) {
        debug_assert!(
            self.unassigned_orders.is_disjoint(&self.assigned_orders),
            "an order is both unassigned and assigned"
        );
        for driver in self.drivers.values() {
            debug_assert!(
                driver.held_orders.len() <= driver.max_orders,
                "{} holds more than max_orders",
                driver.id
            );
        }
    }
}
