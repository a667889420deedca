//! Performance benchmarks for sim_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sim_core::entities::{
    Driver, DriverClass, DriverId, Order, OrderId, OrderStatus, ParcelSize, ServiceLevel,
    VehicleType,
};
use sim_core::geo::Point;
use sim_core::matching::{greedy_matching, DistanceTimeCost, DriverLoad, MatchParams};
use sim_core::{Simulation, SimulationConfig};

const CENTER: Point = Point {
    lat: 33.7294,
    lng: 73.0931,
};

fn spread_point(i: u32) -> Point {
    // Deterministic scatter over a ~20 km box.
    Point {
        lat: CENTER.lat + f64::from(i % 17) * 0.01 - 0.08,
        lng: CENTER.lng + f64::from(i % 23) * 0.01 - 0.11,
    }
}

fn make_orders(count: u32) -> Vec<Order> {
    (0..count)
        .map(|i| Order {
            id: OrderId(i),
            pickup: spread_point(i),
            drop: spread_point(i.wrapping_mul(7) + 3),
            window_start: 480,
            window_end: 720 + u64::from(i % 4) * 120,
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
        })
        .collect()
}

fn make_drivers(count: u32) -> Vec<Driver> {
    (0..count)
        .map(|i| Driver {
            id: DriverId(i),
            class: DriverClass::Yango,
            vehicle_type: VehicleType::Car,
            location: spread_point(i.wrapping_mul(11)),
            capacity_volume_l: 200.0,
            max_weight_kg: 80.0,
            max_detour_km: 8.0,
            speed_kmph: 30.0,
            rating: 4.2,
            max_orders: 12,
            held_orders: Vec::new(),
            total_earnings: 0.0,
        })
        .collect()
}

fn bench_greedy_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_matching");
    for (orders, drivers) in [(50u32, 20u32), (200, 70), (500, 150)] {
        let order_pool = make_orders(orders);
        let driver_pool = make_drivers(drivers);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{orders}x{drivers}")),
            &(order_pool, driver_pool),
            |b, (order_pool, driver_pool)| {
                let order_refs: Vec<&Order> = order_pool.iter().collect();
                let driver_refs: Vec<(&Driver, DriverLoad)> = driver_pool
                    .iter()
                    .map(|driver| (driver, DriverLoad::default()))
                    .collect();
                b.iter(|| {
                    black_box(greedy_matching(
                        &order_refs,
                        &driver_refs,
                        480,
                        MatchParams::default(),
                        &DistanceTimeCost::default(),
                    ));
                });
            },
        );
    }
    group.finish();
}

fn bench_full_day(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_day");
    for (name, orders) in [("small", 100usize), ("large", 500)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &orders, |b, &orders| {
            b.iter(|| {
                let config = SimulationConfig {
                    num_orders: orders,
                    seed: 42,
                    ..Default::default()
                };
                let mut sim = Simulation::new(&config).expect("valid config");
                black_box(sim.run());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_greedy_matching, bench_full_day);
criterion_main!(benches);
