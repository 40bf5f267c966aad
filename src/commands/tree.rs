//! Tree command implementation.
//!
//! Prints the parent/child lineage of one snapshot.

use crate::commands::render::{render_forest, render_tree};
use crate::commands::snapshot::take_snapshot;
use crate::config::Config;

/// Prints the lineage tree, optionally only below `root`.
pub fn command_tree(root: Option<i32>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let report = take_snapshot(config);
    let snapshot = &report.snapshot;

    let rendered = match root {
        Some(pid) => {
            if !snapshot.contains(pid) {
                return Err(format!("pid {} not found in snapshot", pid).into());
            }
            render_tree(snapshot, &[pid])
        }
        None => render_forest(snapshot),
    };

    print!("{}", rendered);
    Ok(())
}
