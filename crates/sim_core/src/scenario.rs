//! Scenario setup: generate a day of orders, drivers, and the backup fleet
//! from a seeded RNG, and load the event queue.
//!
//! Entities are generated up front but enter the live state just-in-time:
//! arrival events carry the id, and the pending queues hold the records
//! until their event fires.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Resource, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{CancelTarget, EventKind, SimulationClock};
use crate::config::SimulationConfig;
use crate::entities::{
    Driver, DriverClass, DriverId, FleetId, FleetVehicle, Order, OrderId, OrderStatus, ParcelSize,
    ServiceLevel, VehicleType,
};
use crate::geo::{self, Point};
use crate::kpi::KpiTracker;
use crate::pricing;
use crate::state::SimulationState;

/// City center used for generation: Islamabad.
pub const CITY_CENTER: Point = Point {
    lat: 33.7294,
    lng: 73.0931,
};

/// Orders and drivers are sampled inside this radius around the center.
const CITY_RADIUS_KM: f64 = 25.0;

/// Delivery time slots (minutes-of-day): morning, midday, evening, night.
const TIME_SLOTS: [(u64, u64); 4] = [(480, 720), (720, 960), (960, 1200), (1200, 1320)];

/// Minimum runway between arrival and a usable slot's close.
const MIN_SLOT_RUNWAY_MIN: u64 = 30;

/// Share of orders that later cancel.
const ORDER_CANCEL_RATE: f64 = 0.03;

/// Share of drivers that quit partway through their shift.
const DRIVER_CANCEL_RATE: f64 = 0.05;

/// Orders awaiting their arrival event, in arrival order.
#[derive(Debug, Clone, Default, Resource)]
pub struct PendingOrders(pub VecDeque<Order>);

/// Drivers awaiting their shift-start event, in arrival order.
#[derive(Debug, Clone, Default, Resource)]
pub struct PendingDrivers(pub VecDeque<Driver>);

fn random_point<R: Rng>(rng: &mut R) -> Point {
    // sqrt keeps the density uniform over the disk instead of clustering
    // at the center.
    let radius_km = CITY_RADIUS_KM * rng.gen::<f64>().sqrt();
    let angle = rng.gen::<f64>() * std::f64::consts::TAU;
    let lat_per_km = 1.0 / 111.0;
    let lng_per_km = 1.0 / (111.0 * CITY_CENTER.lat.to_radians().cos());
    Point {
        lat: CITY_CENTER.lat + radius_km * angle.sin() * lat_per_km,
        lng: CITY_CENTER.lng + radius_km * angle.cos() * lng_per_km,
    }
}

fn pick_weighted<T: Copy, R: Rng>(rng: &mut R, choices: &[(T, f64)]) -> T {
    let total: f64 = choices.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen::<f64>() * total;
    for (value, weight) in choices {
        roll -= weight;
        if roll <= 0.0 {
            return *value;
        }
    }
    choices[choices.len() - 1].0
}

fn sample_parcel_size<R: Rng>(rng: &mut R) -> ParcelSize {
    pick_weighted(
        rng,
        &[
            (ParcelSize::S, 0.2),
            (ParcelSize::M, 0.4),
            (ParcelSize::L, 0.3),
            (ParcelSize::Xl, 0.1),
        ],
    )
}

fn sample_service_level<R: Rng>(rng: &mut R) -> ServiceLevel {
    pick_weighted(
        rng,
        &[
            (ServiceLevel::NextDay, 0.65),
            (ServiceLevel::SameDay, 0.25),
            (ServiceLevel::Flex, 0.10),
        ],
    )
}

/// Volume (liters) and weight (kg) ranges per size class.
fn sample_dimensions<R: Rng>(rng: &mut R, size: ParcelSize) -> (f64, f64) {
    let (volume, weight) = match size {
        ParcelSize::Xs => (rng.gen_range(1.0..5.0), rng.gen_range(0.5..2.0)),
        ParcelSize::S => (rng.gen_range(5.0..20.0), rng.gen_range(1.0..5.0)),
        ParcelSize::M => (rng.gen_range(20.0..60.0), rng.gen_range(5.0..15.0)),
        ParcelSize::L => (rng.gen_range(60.0..150.0), rng.gen_range(15.0..40.0)),
        ParcelSize::Xl => (rng.gen_range(150.0..300.0), rng.gen_range(40.0..80.0)),
    };
    (volume, weight)
}

/// Picks a delivery window: a random time slot that still has at least
/// `MIN_SLOT_RUNWAY_MIN` minutes left after the arrival time. Slots closing
/// after `day_end` are excluded so every window can resolve within the run.
fn sample_window<R: Rng>(rng: &mut R, arrival: u64, day_end: u64) -> (u64, u64) {
    let usable: Vec<(u64, u64)> = TIME_SLOTS
        .iter()
        .copied()
        .filter(|(_, end)| *end > arrival + MIN_SLOT_RUNWAY_MIN && *end <= day_end)
        .collect();
    if usable.is_empty() {
        return (arrival, day_end);
    }
    let (slot_start, slot_end) = usable[rng.gen_range(0..usable.len())];
    (slot_start.max(arrival), slot_end)
}

fn generate_order<R: Rng>(rng: &mut R, id: u32, arrival: u64, day_end: u64) -> Order {
    let pickup = random_point(rng);
    let drop = random_point(rng);
    let size_class = sample_parcel_size(rng);
    let service_level = sample_service_level(rng);
    let (volume_l, weight_kg) = sample_dimensions(rng, size_class);
    let (window_start, window_end) = sample_window(rng, arrival, day_end);
    let base_price =
        pricing::order_base_price(geo::distance_km(pickup, drop), size_class, service_level);

    Order {
        id: OrderId(id),
        pickup,
        drop,
        window_start,
        window_end,
        volume_l,
        weight_kg,
        size_class,
        service_level,
        base_price,
        status: OrderStatus::Published,
        assigned_to: None,
        accepted_at: None,
        picked_up_at: None,
        delivered_at: None,
    }
}

fn generate_driver<R: Rng>(
    rng: &mut R,
    id: u32,
    class: DriverClass,
    max_detour_km: f64,
) -> Driver {
    let (vehicle_type, speed_kmph, capacity_volume_l, max_weight_kg, max_orders, rating) =
        match class {
            // Buses run fixed routes at a fixed service standard.
            DriverClass::Metro => (VehicleType::Bus, 25.0, 300.0, 100.0, 3, 4.5),
            DriverClass::Yango => {
                let motorbike = rng.gen_bool(0.5);
                let (vehicle, speed, volume, weight) = if motorbike {
                    (VehicleType::Motorbike, 35.0, 40.0, 15.0)
                } else {
                    (VehicleType::Car, 30.0, 150.0, 60.0)
                };
                (vehicle, speed, volume, weight, 12, rng.gen_range(3.5..5.0))
            }
            DriverClass::Shahzore => (
                VehicleType::Truck,
                25.0,
                1000.0,
                500.0,
                2,
                rng.gen_range(3.5..5.0),
            ),
        };

    Driver {
        id: DriverId(id),
        class,
        vehicle_type,
        location: random_point(rng),
        capacity_volume_l,
        max_weight_kg,
        max_detour_km,
        speed_kmph,
        rating,
        max_orders,
        held_orders: Vec::new(),
        total_earnings: 0.0,
    }
}

/// Builds a full scenario into `world`: seeds the RNG from the config,
/// generates orders and drivers, loads the event queue, and inserts every
/// resource the schedule needs.
pub fn build_scenario(world: &mut World, config: &SimulationConfig) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut clock = SimulationClock::default();
    let mut state = SimulationState {
        match_params: crate::matching::MatchParams {
            bundling_enabled: config.bundling_enabled,
            bundle_size_limit: config.bundle_size_limit,
            bundle_proximity_km: config.bundle_proximity_km,
        },
        base_price_multiplier: config.base_price_multiplier,
        overflow_margin_min: config.overflow_margin_min,
        ..Default::default()
    };

    // Orders arrive through the first half of the day so the tail of the
    // horizon is left for deliveries.
    let arrival_span = (config.horizon_minutes() / 2).max(1);
    let mut orders: Vec<(u64, Order)> = (0..config.num_orders as u32)
        .map(|id| {
            let arrival = config.start_minute + rng.gen_range(0..arrival_span);
            (arrival, generate_order(&mut rng, id, arrival, config.end_minute))
        })
        .collect();
    orders.sort_by_key(|(arrival, order)| (*arrival, order.id));

    let mut pending_orders = PendingOrders::default();
    for (arrival, order) in &orders {
        clock.schedule(*arrival, EventKind::OrderArrival(order.id));
        pending_orders.0.push_back(order.clone());
    }

    // A few orders cancel some time after showing up.
    for (arrival, order) in &orders {
        if rng.gen::<f64>() < ORDER_CANCEL_RATE {
            let delay = rng.gen_range(10..60);
            clock.schedule(arrival + delay, EventKind::Cancellation(CancelTarget::Order(order.id)));
        }
    }

    // Drivers come on shift across the first quarter of the day.
    let shift_span = (config.horizon_minutes() / 4).max(1);
    let classes = std::iter::empty()
        .chain(std::iter::repeat(DriverClass::Metro).take(config.metro_drivers))
        .chain(std::iter::repeat(DriverClass::Yango).take(config.yango_drivers))
        .chain(std::iter::repeat(DriverClass::Shahzore).take(config.shahzore_trucks));
    let mut drivers: Vec<(u64, Driver)> = classes
        .enumerate()
        .map(|(id, class)| {
            let arrival = config.start_minute + rng.gen_range(0..shift_span);
            (
                arrival,
                generate_driver(&mut rng, id as u32, class, config.max_detour_km),
            )
        })
        .collect();
    drivers.sort_by_key(|(arrival, driver)| (*arrival, driver.id));

    let mut pending_drivers = PendingDrivers::default();
    for (arrival, driver) in &drivers {
        clock.schedule(*arrival, EventKind::DriverArrival(driver.id));
        pending_drivers.0.push_back(driver.clone());
    }

    // A few drivers quit mid-shift; on-board orders still get delivered.
    for (arrival, driver) in &drivers {
        if rng.gen::<f64>() < DRIVER_CANCEL_RATE {
            let delay = rng.gen_range(60..360);
            clock.schedule(
                arrival + delay,
                EventKind::Cancellation(CancelTarget::Driver(driver.id)),
            );
        }
    }

    // The backup fleet is stationed at the depot from minute one.
    for id in 0..config.fleet_vehicles as u32 {
        state.add_fleet_vehicle(FleetVehicle {
            id: FleetId(id),
            capacity_volume_l: 500.0,
            max_weight_kg: 200.0,
            cost_per_km: 2.0,
            cost_per_min: 0.1,
            location: CITY_CENTER,
            dispatched: false,
            deliveries: 0,
            accrued_cost: 0.0,
        });
    }

    // Ticks go in last: at equal timestamps every arrival and cancellation
    // settles before the tick's matching pass sees the state. One extra
    // tick past the end of day sweeps up orders whose window closed at
    // exactly the final minute, since expiry is strict.
    let mut tick = 1u32;
    let mut t = config.start_minute + config.tick_interval_min;
    while t <= config.end_minute + config.tick_interval_min {
        clock.schedule(t, EventKind::Tick(tick));
        tick += 1;
        t += config.tick_interval_min;
    }

    world.insert_resource(clock);
    world.insert_resource(state);
    world.insert_resource(pending_orders);
    world.insert_resource(pending_drivers);
    world.insert_resource(KpiTracker::default());
}
