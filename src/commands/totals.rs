//! Totals command implementation.
//!
//! Rolls up resource usage of an application process tree and of
//! everything else on the host.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::commands::render::render_totals;
use crate::commands::snapshot::take_snapshot;
use crate::config::Config;
use procsnap::{app_totals, non_app_totals, ResourceTotals};

#[derive(Serialize)]
struct TotalsOutput {
    pid: i32,
    app: ResourceTotals,
    non_app: ResourceTotals,
}

/// Prints application and non-application totals.
pub fn command_totals(
    pid: i32,
    other: &[i32],
    format: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut report = take_snapshot(config);

    let app = app_totals(&mut report.snapshot, pid, other)
        .ok_or_else(|| format!("pid {} not found in snapshot", pid))?;
    // app_totals flags the whole tree, so it is excluded here
    let non_app = non_app_totals(&report.snapshot);

    let output = TotalsOutput { pid, app, non_app };
    match format {
        OutputFormat::Table => {
            print!("{}", render_totals(&format!("Application {}", pid), &output.app));
            print!("{}", render_totals("Other processes", &output.non_app));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&output)?),
    }
    Ok(())
}
