//! Top-level simulation facade: build from a config, run to completion,
//! read the results.

use bevy_ecs::prelude::{Schedule, World};

use crate::config::{ConfigError, SimulationConfig};
use crate::kpi::{KpiMetrics, KpiTracker};
use crate::runner::{run_until_empty, simulation_schedule};
use crate::scenario::build_scenario;
use crate::state::SimulationState;

/// Hard cap on event steps, well above anything a sane scenario produces.
const MAX_STEPS: usize = 1_000_000;

/// Final roll-up of one run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SimulationResults {
    pub total_orders: u32,
    pub total_drivers: u32,
    pub matched_orders: u32,
    pub unmatched_orders: u32,
    pub completed_deliveries: u32,
    pub kpis: KpiMetrics,
}

/// An owned simulation: one world, one schedule, run once.
pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    /// Validates the config and builds the scenario. Fails fast on a bad
    /// config rather than producing a nonsense run.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new();
        build_scenario(&mut world, config);
        Ok(Self {
            world,
            schedule: simulation_schedule(),
        })
    }

    /// Runs until the event queue drains. Returns the number of events
    /// processed. Running an already-drained simulation is a no-op.
    pub fn run(&mut self) -> usize {
        let steps = run_until_empty(&mut self.world, &mut self.schedule, MAX_STEPS);
        // Final recompute so the results reflect events after the last tick.
        self.world
            .resource_scope(|world, mut kpis: bevy_ecs::prelude::Mut<KpiTracker>| {
                kpis.recompute(world.resource::<SimulationState>());
            });
        steps
    }

    /// Per-tick KPI history captured during the run.
    pub fn kpi_history(&self) -> &[KpiMetrics] {
        &self.world.resource::<KpiTracker>().history
    }

    pub fn results(&self) -> SimulationResults {
        let state = self.world.resource::<SimulationState>();
        let kpis = crate::kpi::compute_metrics(state);
        let matched = kpis.accepted + kpis.picked_up + kpis.delivered;
        SimulationResults {
            total_orders: kpis.total_orders,
            total_drivers: kpis.total_drivers,
            matched_orders: matched,
            unmatched_orders: kpis.total_orders - matched,
            completed_deliveries: kpis.completed_deliveries,
            kpis,
        }
    }

    pub fn state(&self) -> &SimulationState {
        self.world.resource::<SimulationState>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::entities::OrderStatus;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            num_orders: 40,
            metro_drivers: 3,
            yango_drivers: 10,
            shahzore_trucks: 1,
            fleet_vehicles: 4,
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = SimulationConfig {
            tick_interval_min: 0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(&config),
            Err(ConfigError::ZeroTickInterval)
        ));
    }

    #[test]
    fn full_run_resolves_every_order() {
        let mut sim = Simulation::new(&small_config()).expect("valid config");
        let steps = sim.run();
        assert!(steps > 0);

        // Once the queue drains every order is terminal: delivered,
        // expired, or cancelled. Windows never extend past the last tick,
        // so nothing can be left hanging.
        let state = sim.state();
        for order in state.orders.values() {
            assert!(
                order.status.is_terminal(),
                "order {} left in {:?}",
                order.id,
                order.status
            );
        }

        let results = sim.results();
        assert_eq!(results.total_orders, 40);
        assert_eq!(
            results.matched_orders + results.unmatched_orders,
            results.total_orders
        );
        assert!(results.kpis.validate().is_empty());
    }

    #[test]
    fn identical_seeds_give_identical_results() {
        let config = small_config();
        let mut first = Simulation::new(&config).expect("valid config");
        let mut second = Simulation::new(&config).expect("valid config");
        let steps_first = first.run();
        let steps_second = second.run();

        assert_eq!(steps_first, steps_second);
        assert_eq!(first.results(), second.results());
        assert_eq!(first.kpi_history(), second.kpi_history());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut first = Simulation::new(&small_config()).expect("valid config");
        let mut second = Simulation::new(&SimulationConfig {
            seed: 8,
            ..small_config()
        })
        .expect("valid config");
        first.run();
        second.run();
        assert_ne!(first.results(), second.results());
    }

    #[test]
    fn zero_supply_yields_zero_matches_without_errors() {
        let config = SimulationConfig {
            num_orders: 20,
            metro_drivers: 0,
            yango_drivers: 0,
            shahzore_trucks: 0,
            fleet_vehicles: 0,
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).expect("valid config");
        sim.run();

        let results = sim.results();
        assert_eq!(results.total_drivers, 0);
        assert_eq!(results.matched_orders, 0);
        assert_eq!(results.kpis.match_rate, 0.0);
        assert!(sim.state().orders.values().all(|order| matches!(
            order.status,
            OrderStatus::Expired | OrderStatus::Cancelled
        )));
    }

    #[test]
    fn overflow_fleet_rescues_orders_no_driver_takes() {
        let config = SimulationConfig {
            num_orders: 20,
            metro_drivers: 0,
            yango_drivers: 0,
            shahzore_trucks: 0,
            fleet_vehicles: 5,
            ..Default::default()
        };
        let mut sim = Simulation::new(&config).expect("valid config");
        sim.run();

        let results = sim.results();
        assert!(results.kpis.fleet_dispatches > 0);
        assert!(results.completed_deliveries > 0);
        assert!(results.kpis.fleet_cost > 0.0);
    }

    #[test]
    fn rerunning_a_drained_simulation_changes_nothing() {
        let mut sim = Simulation::new(&small_config()).expect("valid config");
        sim.run();
        let before = sim.results();
        let extra_steps = sim.run();
        assert_eq!(extra_steps, 0);
        assert_eq!(sim.results(), before);
    }
}
