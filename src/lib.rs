//! procsnap: point-in-time snapshots of the Unix process table.
//!
//! One scan walks the process-table pseudo-filesystem, parses every
//! process's kernel record and normalizes it: sizes in bytes, CPU time in
//! seconds, fault counts summed. Records that cannot be decoded are dropped
//! and reported only through an aggregate status; processes that exit
//! mid-scan are skipped silently.
//!
//! # Usage
//!
//! ```rust,no_run
//! use procsnap::{scan_processes, ScanOptions};
//! use std::path::Path;
//!
//! let opts = ScanOptions::new(std::process::id() as i32);
//! let report = scan_processes(Path::new("/proc"), &opts);
//!
//! for p in &report.snapshot {
//!     println!("{} {} {:.2}s", p.id, p.command, p.cpu_time());
//! }
//! if !report.status.is_complete() {
//!     eprintln!("some records were malformed (code {})", report.status.code());
//! }
//! ```
//!
//! # Platforms
//!
//! Linux (and other systems exposing `/proc/<pid>/stat`) use the text record.
//! Solaris and illumos use the binary `psinfo` / `usage` records. The choice
//! is made at build time.

pub mod error;
pub mod process;

// Re-export main types for convenience
pub use error::{FailureKind, RecordError, ScanStatus};
pub use process::{
    app_totals, find_children, non_app_totals, scan_processes, scan_with, Pid, ProcessInfo,
    ProcessSnapshot, ResourceTotals, ScanOptions, ScanReport, Units,
};
