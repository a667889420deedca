//! KPI metrics: computed fresh from the full state snapshot every tick.
//!
//! Metrics are never updated incrementally. Recomputing from the snapshot
//! keeps them correct through cancellations, expiries, and fleet handoffs
//! without every handler knowing which counters it touches.

use bevy_ecs::prelude::Resource;

use crate::entities::OrderStatus;
use crate::state::SimulationState;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct KpiMetrics {
    pub tick: u32,
    pub total_orders: u32,
    pub published: u32,
    pub accepted: u32,
    pub picked_up: u32,
    pub delivered: u32,
    pub expired: u32,
    pub cancelled: u32,
    /// Share of all orders that have been accepted by some courier.
    pub match_rate: f64,

    pub total_drivers: u32,
    /// Drivers currently holding at least one order.
    pub active_drivers: u32,
    pub driver_utilization: f64,
    pub total_driver_earnings: f64,

    /// Sum of prices of matched orders.
    pub revenue: f64,
    pub fleet_dispatches: u32,
    pub fleet_cost: f64,
    /// Driver payouts plus fleet operating cost.
    pub total_cost: f64,
    /// Revenue minus total cost.
    pub platform_profit: f64,

    pub completed_deliveries: u32,
    pub total_distance_km: f64,
    pub total_emissions_kg: f64,
    pub avg_delivery_time_min: f64,
}

impl KpiMetrics {
    /// Internal consistency checks. Violations are reported, not fatal:
    /// a skewed metric should never halt a run mid-day.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let by_status = self.published
            + self.accepted
            + self.picked_up
            + self.delivered
            + self.expired
            + self.cancelled;
        if by_status != self.total_orders {
            problems.push(format!(
                "status counts sum to {by_status}, expected {}",
                self.total_orders
            ));
        }
        if !(0.0..=1.0).contains(&self.match_rate) {
            problems.push(format!("match_rate {} outside [0, 1]", self.match_rate));
        }
        if !(0.0..=1.0).contains(&self.driver_utilization) {
            problems.push(format!(
                "driver_utilization {} outside [0, 1]",
                self.driver_utilization
            ));
        }
        if self.delivered != self.completed_deliveries {
            problems.push(format!(
                "delivered orders {} != completed deliveries {}",
                self.delivered, self.completed_deliveries
            ));
        }
        for (name, value) in [
            ("revenue", self.revenue),
            ("total_cost", self.total_cost),
            ("total_distance_km", self.total_distance_km),
            ("total_emissions_kg", self.total_emissions_kg),
            ("avg_delivery_time_min", self.avg_delivery_time_min),
        ] {
            if value < 0.0 || !value.is_finite() {
                problems.push(format!("{name} is {value}"));
            }
        }
        problems
    }
}

/// Computes the full metric set from a state snapshot.
pub fn compute_metrics(state: &SimulationState) -> KpiMetrics {
    let mut metrics = KpiMetrics {
        tick: state.tick_number,
        total_orders: state.orders.len() as u32,
        total_drivers: state.drivers.len() as u32,
        completed_deliveries: state.completed_deliveries,
        fleet_dispatches: state.fleet_dispatches,
        total_distance_km: state.total_distance_km,
        total_emissions_kg: state.total_emissions_kg,
        ..Default::default()
    };

    for order in state.orders.values() {
        match order.status {
            OrderStatus::Published => metrics.published += 1,
            OrderStatus::Accepted => metrics.accepted += 1,
            OrderStatus::PickedUp => metrics.picked_up += 1,
            OrderStatus::Delivered => metrics.delivered += 1,
            OrderStatus::Expired => metrics.expired += 1,
            OrderStatus::Cancelled => metrics.cancelled += 1,
        }
        if order.status.is_matched() {
            metrics.revenue += order.base_price;
        }
    }
    if metrics.total_orders > 0 {
        let matched = metrics.accepted + metrics.picked_up + metrics.delivered;
        metrics.match_rate = f64::from(matched) / f64::from(metrics.total_orders);
    }

    for driver in state.drivers.values() {
        if !driver.held_orders.is_empty() {
            metrics.active_drivers += 1;
        }
        metrics.total_driver_earnings += driver.total_earnings;
    }
    if metrics.total_drivers > 0 {
        metrics.driver_utilization =
            f64::from(metrics.active_drivers) / f64::from(metrics.total_drivers);
    }

    metrics.fleet_cost = state.fleet.values().map(|v| v.accrued_cost).sum();
    metrics.total_cost = metrics.total_driver_earnings + metrics.fleet_cost;
    metrics.platform_profit = metrics.revenue - metrics.total_cost;

    if state.completed_deliveries > 0 {
        metrics.avg_delivery_time_min =
            state.total_delivery_time_min / f64::from(state.completed_deliveries);
    }

    metrics
}

/// Resource holding the latest metrics and the per-tick history.
#[derive(Debug, Default, Resource)]
pub struct KpiTracker {
    pub metrics: KpiMetrics,
    pub history: Vec<KpiMetrics>,
}

impl KpiTracker {
    pub fn recompute(&mut self, state: &SimulationState) {
        let metrics = compute_metrics(state);
        for problem in metrics.validate() {
            log::warn!("kpi validation at tick {}: {problem}", metrics.tick);
        }
        self.history.push(metrics.clone());
        self.metrics = metrics;
    }
}
