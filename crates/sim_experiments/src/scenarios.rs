//! Named scenario presets: config variations worth comparing side by side.

use sim_core::SimulationConfig;

/// A named configuration for one comparable run.
#[derive(Debug, Clone)]
pub struct ScenarioSpec {
    pub name: &'static str,
    pub config: SimulationConfig,
}

/// The standard comparison set: a baseline plus demand, supply, pricing,
/// and cost variations. All share one seed so differences come from the
/// knobs, not the draw.
pub fn standard_scenarios(seed: u64) -> Vec<ScenarioSpec> {
    let base = SimulationConfig {
        seed,
        ..Default::default()
    };

    vec![
        ScenarioSpec {
            name: "baseline",
            config: base.clone(),
        },
        ScenarioSpec {
            name: "high_demand",
            config: SimulationConfig {
                num_orders: base.num_orders * 3,
                ..base.clone()
            },
        },
        ScenarioSpec {
            name: "low_supply",
            config: SimulationConfig {
                yango_drivers: base.yango_drivers / 4,
                metro_drivers: base.metro_drivers / 2,
                ..base.clone()
            },
        },
        ScenarioSpec {
            name: "premium_pricing",
            config: SimulationConfig {
                base_price_multiplier: 1.4,
                ..base.clone()
            },
        },
        ScenarioSpec {
            name: "wide_detour",
            config: SimulationConfig {
                max_detour_km: base.max_detour_km * 2.0,
                bundle_size_limit: base.bundle_size_limit + 2,
                ..base
            },
        },
    ]
}
