//! Runs the standard scenario set in parallel and prints a comparison,
//! writing the full results to `scenario_report.json`.
//!
//! ```sh
//! RUST_LOG=info cargo run --release --example scenario_comparison
//! ```

use std::path::Path;

use sim_experiments::{
    comparison_table, run_scenarios_parallel, standard_scenarios, write_json_report,
};

fn main() {
    env_logger::init();

    let specs = standard_scenarios(42);
    let outcomes = run_scenarios_parallel(&specs);

    print!("{}", comparison_table(&outcomes));

    let report_path = Path::new("scenario_report.json");
    match write_json_report(report_path, &outcomes) {
        Ok(()) => println!("\nfull results written to {}", report_path.display()),
        Err(error) => eprintln!("failed to write report: {error}"),
    }
}
