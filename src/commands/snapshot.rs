//! Snapshot command implementation.
//!
//! Takes one snapshot of the process table and prints it.

use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::commands::render::render_table;
use crate::config::Config;
use procsnap::{scan_processes, ProcessInfo, ScanReport};

/// Machine-readable snapshot output.
#[derive(Serialize)]
struct SnapshotOutput<'a> {
    status: i32,
    process_count: usize,
    processes: Vec<&'a ProcessInfo>,
}

/// Pid of this process, used to flag itself as an application process.
pub fn own_pid() -> procsnap::Pid {
    nix::unistd::getpid().as_raw()
}

/// Runs one scan with the effective configuration.
pub fn take_snapshot(config: &Config) -> ScanReport {
    let root = config.proc_root();
    let opts = config.scan_options(own_pid());

    let start = Instant::now();
    let report = scan_processes(&root, &opts);
    info!(
        "Scanned {} in {:.2}ms: {} processes",
        root.display(),
        start.elapsed().as_secs_f64() * 1000.0,
        report.snapshot.len()
    );
    if !report.status.is_complete() {
        warn!(
            "Some process records were malformed and skipped (status {})",
            report.status.code()
        );
    }
    report
}

/// Serializes a scan report in the requested format.
pub fn format_report(
    report: &ScanReport,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = SnapshotOutput {
        status: report.status.code(),
        process_count: report.snapshot.len(),
        processes: report.snapshot.iter().collect(),
    };
    Ok(match format {
        OutputFormat::Table => render_table(&report.snapshot),
        OutputFormat::Json => serde_json::to_string_pretty(&output)?,
        OutputFormat::Yaml => serde_yaml::to_string(&output)?,
    })
}

/// Takes and prints one snapshot. With `strict`, exits 1 if any record was
/// malformed.
pub fn command_snapshot(
    format: OutputFormat,
    strict: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = take_snapshot(config);
    print!("{}", format_report(&report, format)?);
    if matches!(format, OutputFormat::Json) {
        println!();
    }

    if strict && !report.status.is_complete() {
        std::process::exit(1);
    }
    Ok(())
}
