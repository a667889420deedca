//! Result export: JSON reports and a plain-text comparison table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::runner::ScenarioOutcome;

/// Writes all outcomes to a pretty-printed JSON file.
pub fn write_json_report(path: &Path, outcomes: &[ScenarioOutcome]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, outcomes)?;
    writer.flush()
}

/// Renders a fixed-width comparison table of the headline numbers.
pub fn comparison_table(outcomes: &[ScenarioOutcome]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<18} {:>8} {:>8} {:>10} {:>10} {:>10} {:>8}\n",
        "scenario", "orders", "matched", "delivered", "revenue", "profit", "fleet"
    ));
    for outcome in outcomes {
        let k = &outcome.results.kpis;
        out.push_str(&format!(
            "{:<18} {:>8} {:>8} {:>10} {:>10.1} {:>10.1} {:>8}\n",
            outcome.name,
            outcome.results.total_orders,
            outcome.results.matched_orders,
            outcome.results.completed_deliveries,
            k.revenue,
            k.platform_profit,
            k.fleet_dispatches,
        ));
    }
    out
}
