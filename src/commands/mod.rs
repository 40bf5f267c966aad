//! CLI command implementations for procsnap.
//!
//! This module provides implementations for all CLI subcommands:
//! - `snapshot`: One scan, printed as table, JSON or YAML
//! - `tree`: Process lineage
//! - `totals`: Application / non-application resource roll-ups
//! - `check`: System validation
//! - `config`: Effective configuration

pub mod check;
pub mod config;
pub mod render;
pub mod snapshot;
pub mod totals;
pub mod tree;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use snapshot::command_snapshot;
pub use totals::command_totals;
pub use tree::command_tree;
