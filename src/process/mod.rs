//! Process-table snapshot modules.
//!
//! This module provides:
//! - `record`: `/proc/<pid>/stat` text record parsing (Linux)
//! - `psinfo`: `psinfo` / `usage` binary record decoding (Solaris, illumos)
//! - `units`: host page size and clock tick rate
//! - `classifier`: application-family and priority flags
//! - `source`: the per-platform record source
//! - `scanner`: process discovery and snapshot building
//! - `lineage`: child lists and resource roll-ups

pub mod classifier;
pub mod info;
pub mod lineage;
pub mod psinfo;
pub mod record;
pub mod scanner;
pub mod source;
pub mod units;

// Re-export commonly used types
pub use classifier::{is_app_process, DEFAULT_APP_FAMILY, LINUX_LOWEST_PRIORITY};
pub use info::{Pid, ProcessInfo, ProcessSnapshot, COMMAND_MAX_LEN};
pub use lineage::{app_totals, descendants, find_children, non_app_totals, ResourceTotals};
pub use record::{parse_stat_line, ProcStat, STAT_FIELD_COUNT};
pub use scanner::{
    collect_proc_entries, scan_processes, scan_with, ProcEntry, ScanOptions, ScanReport,
    DEFAULT_PROC_ROOT,
};
pub use source::{PlatformSource, PsinfoSource, RecordSource, StatFileSource};
pub use units::{Units, CLK_TCK, PAGE_SIZE};
