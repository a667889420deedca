//! Runs one default day and prints the headline KPIs.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example scenario_run
//! ```

use sim_core::{Simulation, SimulationConfig};

fn main() {
    env_logger::init();

    let config = SimulationConfig::default();
    let mut sim = match Simulation::new(&config) {
        Ok(sim) => sim,
        Err(error) => {
            eprintln!("bad config: {error}");
            std::process::exit(1);
        }
    };

    let steps = sim.run();
    let results = sim.results();

    println!("events processed: {steps}");
    println!(
        "orders: {} total, {} matched, {} delivered, {} expired",
        results.total_orders,
        results.matched_orders,
        results.completed_deliveries,
        results.kpis.expired
    );
    println!(
        "economics: revenue {:.1}, driver payouts {:.1}, fleet cost {:.1}, profit {:.1}",
        results.kpis.revenue,
        results.kpis.total_driver_earnings,
        results.kpis.fleet_cost,
        results.kpis.platform_profit
    );
    println!(
        "ops: {:.1} km driven, {:.1} kg CO2, avg delivery {:.1} min, {} fleet dispatches",
        results.kpis.total_distance_km,
        results.kpis.total_emissions_kg,
        results.kpis.avg_delivery_time_min,
        results.kpis.fleet_dispatches
    );
}
