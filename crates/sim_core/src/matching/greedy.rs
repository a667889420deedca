//! Greedy earliest-deadline-first matching with opportunistic bundling.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{Driver, DriverId, Order, OrderId};
use crate::geo::{self, Point};

use super::filters::{is_feasible, DriverLoad};

/// Scores a candidate delivery leg. Lower is better.
pub trait CostModel {
    fn delivery_cost(&self, distance_km: f64, time_minutes: f64) -> f64;
}

/// Default cost model: a weighted sum of distance and time.
#[derive(Debug, Clone, Copy)]
pub struct DistanceTimeCost {
    pub per_km: f64,
    pub per_min: f64,
}

impl Default for DistanceTimeCost {
    fn default() -> Self {
        Self {
            per_km: 1.0,
            per_min: 0.1,
        }
    }
}

impl CostModel for DistanceTimeCost {
    fn delivery_cost(&self, distance_km: f64, time_minutes: f64) -> f64 {
        distance_km * self.per_km + time_minutes * self.per_min
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// When false, every order is seeded independently to its cheapest
    /// driver and no bundles form.
    pub bundling_enabled: bool,
    /// Most orders one matching pass will put on a single driver.
    pub bundle_size_limit: usize,
    /// Orders further from the bundle seed's pickup than this are never
    /// considered for the same bundle.
    pub bundle_proximity_km: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            bundling_enabled: true,
            bundle_size_limit: 3,
            bundle_proximity_km: 3.0,
        }
    }
}

/// One proposed order-to-driver pairing, with the cost the matcher saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub order: OrderId,
    pub driver: DriverId,
    pub cost: f64,
}

/// Per-driver working state during one matching pass. The committed driver
/// record is untouched; this tracks where the pass has notionally sent the
/// driver and how much load and detour budget it has consumed.
struct WorkingDriver<'a> {
    driver: &'a Driver,
    position: Point,
    load: DriverLoad,
    detour_used_km: f64,
    assigned_this_pass: usize,
}

/// Match unassigned orders to drivers, earliest deadline first.
///
/// For each order (sorted by `(window_end, id)`), every driver still in the
/// pool is tested for feasibility and the cheapest feasible one wins; ties
/// go to the lowest driver id because candidates are scanned in id order
/// with a strict comparison. With bundling enabled, after a seed match the
/// pass tries to bundle later orders whose pickups sit near the seed pickup
/// onto the same driver, stopping at the first nearby order the driver
/// cannot take; with bundling disabled every order is seeded independently.
/// No driver receives more than `bundle_size_limit` orders in one pass,
/// and there is no backtracking: a committed pairing is never revisited.
pub fn greedy_matching(
    orders: &[&Order],
    drivers: &[(&Driver, DriverLoad)],
    now: u64,
    params: MatchParams,
    cost_model: &dyn CostModel,
) -> Vec<Assignment> {
    let mut queue: Vec<&Order> = orders.to_vec();
    queue.sort_by_key(|order| (order.window_end, order.id));

    let mut pool: BTreeMap<DriverId, WorkingDriver<'_>> = drivers
        .iter()
        .map(|(driver, load)| {
            (
                driver.id,
                WorkingDriver {
                    driver,
                    position: driver.location,
                    load: *load,
                    detour_used_km: 0.0,
                    assigned_this_pass: 0,
                },
            )
        })
        .collect();

    let mut assignments = Vec::new();
    let mut taken: BTreeSet<OrderId> = BTreeSet::new();

    for (seed_idx, seed) in queue.iter().enumerate() {
        if taken.contains(&seed.id) {
            continue;
        }

        let Some((driver_id, cost)) = best_driver(seed, &pool, now, params, cost_model) else {
            continue;
        };

        commit(&mut pool, driver_id, seed);
        taken.insert(seed.id);
        assignments.push(Assignment {
            order: seed.id,
            driver: driver_id,
            cost,
        });

        if !params.bundling_enabled {
            continue;
        }

        // Bundle later orders near the seed pickup onto the same driver.
        for candidate in queue.iter().skip(seed_idx + 1) {
            let working = &pool[&driver_id];
            if working.assigned_this_pass >= params.bundle_size_limit {
                break;
            }
            if taken.contains(&candidate.id) {
                continue;
            }
            if geo::distance_km(seed.pickup, candidate.pickup) > params.bundle_proximity_km {
                continue;
            }
            if !is_feasible(
                candidate,
                working.driver,
                working.load,
                working.position,
                working.detour_used_km,
                now,
            ) {
                // A nearby order the driver cannot take ends this bundle.
                break;
            }
            let cost = leg_cost(candidate, working, cost_model);
            commit(&mut pool, driver_id, candidate);
            taken.insert(candidate.id);
            assignments.push(Assignment {
                order: candidate.id,
                driver: driver_id,
                cost,
            });
        }
    }

    assignments
}

fn leg_cost(order: &Order, working: &WorkingDriver<'_>, cost_model: &dyn CostModel) -> f64 {
    let distance = geo::distance_km(working.position, order.pickup) + order.direct_distance_km();
    let minutes = geo::travel_time_minutes(distance, working.driver.speed_kmph);
    cost_model.delivery_cost(distance, minutes)
}

/// Cheapest feasible driver for `order`, scanning in id order so equal
/// costs resolve to the lowest id.
fn best_driver(
    order: &Order,
    pool: &BTreeMap<DriverId, WorkingDriver<'_>>,
    now: u64,
    params: MatchParams,
    cost_model: &dyn CostModel,
) -> Option<(DriverId, f64)> {
    let mut best: Option<(DriverId, f64)> = None;
    for (id, working) in pool {
        if working.assigned_this_pass >= params.bundle_size_limit {
            continue;
        }
        if !is_feasible(
            order,
            working.driver,
            working.load,
            working.position,
            working.detour_used_km,
            now,
        ) {
            continue;
        }
        let cost = leg_cost(order, working, cost_model);
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((*id, cost));
        }
    }
    best
}

fn commit(pool: &mut BTreeMap<DriverId, WorkingDriver<'_>>, driver_id: DriverId, order: &Order) {
    let working = pool.get_mut(&driver_id).expect("driver in pool");
    working.detour_used_km += geo::distance_km(working.position, order.pickup);
    working.position = order.pickup;
    working.load.add(order);
    working.assigned_this_pass += 1;
}
