pub mod clock;
pub mod config;
pub mod entities;
pub mod geo;
pub mod kpi;
pub mod matching;
pub mod pricing;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod state;
pub mod systems;

#[cfg(test)]
pub mod test_helpers;

pub use config::{ConfigError, SimulationConfig};
pub use kpi::KpiMetrics;
pub use simulation::{Simulation, SimulationResults};
