//! Scenario experimentation for the delivery simulation.
//!
//! Runs named configuration presets in parallel and reports how matching,
//! delivery, and platform economics respond to demand, supply, and pricing
//! changes.
//!
//! ```no_run
//! use sim_experiments::{run_scenarios_parallel, standard_scenarios};
//!
//! let outcomes = run_scenarios_parallel(&standard_scenarios(42));
//! println!("{}", sim_experiments::comparison_table(&outcomes));
//! ```

pub mod report;
pub mod runner;
pub mod scenarios;

pub use report::{comparison_table, write_json_report};
pub use runner::{run_scenario, run_scenarios_parallel, ScenarioOutcome};
pub use scenarios::{standard_scenarios, ScenarioSpec};
