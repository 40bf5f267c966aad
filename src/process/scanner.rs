//! Process scanning: enumerate the process table and build a snapshot.
//!
//! The process directory is live kernel state. Entries can disappear between
//! listing and reading, so absence is never an error; only records that were
//! read but did not decode are reported, and only as an aggregate status.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ScanStatus;
use crate::process::classifier::{is_app_process, DEFAULT_APP_FAMILY};
use crate::process::info::{Pid, ProcessSnapshot};
use crate::process::lineage::find_children;
use crate::process::source::{PlatformSource, RecordSource};
use crate::process::units::Units;

/// Default process-table root.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Process entry representing a directory in the process table.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: Pid,
    pub proc_path: PathBuf,
}

/// Inputs of one scan that are not read from the process table.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Pid of the monitoring process; always flagged as an app process.
    pub own_pid: Pid,
    /// Command substring identifying the application family.
    pub app_family: String,
    pub units: Units,
}

impl ScanOptions {
    pub fn new(own_pid: Pid) -> Self {
        Self {
            own_pid,
            app_family: DEFAULT_APP_FAMILY.to_string(),
            units: Units::host(),
        }
    }
}

/// Result of one scan: the snapshot is always usable, `status` only says
/// whether any record had to be dropped as malformed.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub snapshot: ProcessSnapshot,
    pub status: ScanStatus,
}

/// Returns true for directory names that are process ids.
fn is_pid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Scans the process table for entries with numeric names.
pub fn collect_proc_entries(root: &Path, max: Option<usize>) -> io::Result<Vec<ProcEntry>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)?.flatten() {
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(v) => v,
            None => continue,
        };
        if !is_pid_name(name) {
            continue;
        }
        let pid: Pid = match name.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        out.push(ProcEntry {
            pid,
            proc_path: entry.path(),
        });
        if let Some(maxp) = max {
            if out.len() >= maxp {
                break;
            }
        }
    }
    Ok(out)
}

/// Builds a snapshot of every process under `root` with the platform's
/// record source.
pub fn scan_processes(root: &Path, opts: &ScanOptions) -> ScanReport {
    scan_with(root, &PlatformSource::new(opts.units), opts)
}

/// Builds a snapshot with an explicit record source.
///
/// An unreadable `root` yields an empty snapshot with a complete status.
/// Entries that vanish are skipped; malformed ones are logged, excluded, and
/// reflected in the returned status (the last failure wins). The snapshot
/// goes through [`find_children`] before it is returned.
pub fn scan_with<S: RecordSource>(root: &Path, source: &S, opts: &ScanOptions) -> ScanReport {
    let mut report = ScanReport::default();

    let entries = match collect_proc_entries(root, None) {
        Ok(v) => v,
        Err(e) => {
            debug!("Cannot enumerate {}: {}", root.display(), e);
            return report;
        }
    };

    let mut skipped = 0usize;
    let mut failed = 0usize;

    for entry in &entries {
        let mut info = match source.read_process(&entry.proc_path) {
            Ok(Some(info)) => info,
            Ok(None) => {
                skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("pid {}: {}", entry.pid, e);
                failed += 1;
                report.status = ScanStatus::Partial(e.kind());
                continue;
            }
        };

        info.is_boinc_app = is_app_process(info.id, &info.command, opts.own_pid, &opts.app_family);
        report.snapshot.insert(info);
    }

    find_children(&mut report.snapshot);

    debug!(
        "Scanned {} entries under {}: {} processes, {} skipped, {} malformed (status {})",
        entries.len(),
        root.display(),
        report.snapshot.len(),
        skipped,
        failed,
        report.status.code()
    );

    report
}
