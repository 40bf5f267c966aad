//! Per-process record sources.
//!
//! A [`RecordSource`] turns one `/proc/<pid>` directory into a normalized
//! [`ProcessInfo`]. Which implementation backs [`PlatformSource`] is fixed at
//! build time, since a host only ever exposes one kernel ABI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::RecordError;
use crate::process::classifier::is_linux_low_priority;
use crate::process::info::{Pid, ProcessInfo};
use crate::process::psinfo::{decode, psinfo_to_info, KernelStruct, Prusage, PsinfoHead};
use crate::process::record::{parse_stat_line, ProcStat, MAX_STAT_LINE};
use crate::process::units::Units;

/// Reads one process's record.
pub trait RecordSource {
    /// `Ok(None)` when the process vanished or its files could not be
    /// opened; the scan skips such entries without counting them as errors.
    fn read_process(&self, proc_path: &Path) -> Result<Option<ProcessInfo>, RecordError>;
}

/// The source for the platform this crate was built for.
#[cfg(any(target_os = "solaris", target_os = "illumos"))]
pub type PlatformSource = PsinfoSource;

/// The source for the platform this crate was built for.
#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
pub type PlatformSource = StatFileSource;

/// Errors that mean the process is gone rather than that its record is bad.
fn is_vanished(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::NotFound || e.raw_os_error() == Some(libc::ESRCH)
}

fn open_entry_file(path: &Path) -> Option<File> {
    match File::open(path) {
        Ok(f) => Some(f),
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

// -----------------------------------------------------------------------------
// Linux: /proc/<pid>/stat
// -----------------------------------------------------------------------------

/// Reads the text record in `/proc/<pid>/stat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatFileSource {
    pub units: Units,
}

impl StatFileSource {
    pub fn new(units: Units) -> Self {
        Self { units }
    }
}

/// Reads the first line of a stat file, bounded to [`MAX_STAT_LINE`] bytes.
fn read_stat_line(path: &Path) -> Result<Option<String>, RecordError> {
    let Some(file) = open_entry_file(path) else {
        return Ok(None);
    };

    let mut reader = BufReader::with_capacity(MAX_STAT_LINE, file).take(MAX_STAT_LINE as u64);
    let mut buf = Vec::with_capacity(512);
    match reader.read_until(b'\n', &mut buf) {
        Ok(0) => Err(RecordError::Empty),
        // comm is raw bytes from the executable name; keep the line even if not UTF-8
        Ok(_) => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
        Err(e) if is_vanished(&e) => {
            debug!("{} vanished while reading: {}", path.display(), e);
            Ok(None)
        }
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            Err(RecordError::Empty)
        }
    }
}

/// Normalizes a parsed stat record: pages and ticks become bytes and seconds.
/// `vsize` is already in bytes. A ppid outside the pid range is malformed.
pub fn stat_to_info(stat: &ProcStat, units: &Units) -> Result<ProcessInfo, RecordError> {
    let parentid = Pid::try_from(stat.ppid).map_err(|_| {
        RecordError::malformed(
            &format!("{} ({})", stat.pid, stat.comm),
            format!("ppid {} out of range", stat.ppid),
        )
    })?;
    let mut p = ProcessInfo {
        id: stat.pid,
        parentid,
        swap_size: stat.vsize as f64,
        working_set_size: units.pages_to_bytes(stat.rss),
        // page faults: I/O + non I/O
        page_fault_count: stat.majflt.saturating_add(stat.minflt),
        user_time: units.ticks_to_seconds(stat.utime),
        kernel_time: units.ticks_to_seconds(stat.stime),
        is_low_priority: is_linux_low_priority(stat.priority),
        ..Default::default()
    };
    p.set_command(&stat.comm);
    Ok(p)
}

impl RecordSource for StatFileSource {
    fn read_process(&self, proc_path: &Path) -> Result<Option<ProcessInfo>, RecordError> {
        let Some(line) = read_stat_line(&proc_path.join("stat"))? else {
            return Ok(None);
        };
        let stat = parse_stat_line(&line)?;
        stat_to_info(&stat, &self.units).map(Some)
    }
}

// -----------------------------------------------------------------------------
// Solaris / illumos: /proc/<pid>/psinfo + /proc/<pid>/usage
// -----------------------------------------------------------------------------

/// Reads the binary `psinfo` and `usage` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PsinfoSource;

impl PsinfoSource {
    // Units are implied by the structures (KiB, timespec), so none are taken.
    pub fn new(_units: Units) -> Self {
        Self
    }
}

/// Reads exactly one `T` from `path`, or `Ok(None)` if the file is gone.
fn read_struct<T: KernelStruct>(path: &Path) -> Result<Option<T>, RecordError> {
    let Some(file) = open_entry_file(path) else {
        return Ok(None);
    };

    let len = std::mem::size_of::<T>();
    let mut buf = Vec::with_capacity(len);
    match file.take(len as u64).read_to_end(&mut buf) {
        Ok(_) => decode::<T>(&buf).map(Some),
        Err(e) if is_vanished(&e) => Ok(None),
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            Err(RecordError::Truncated {
                what: T::SOURCE,
                expected: len,
                got: buf.len(),
            })
        }
    }
}

impl RecordSource for PsinfoSource {
    fn read_process(&self, proc_path: &Path) -> Result<Option<ProcessInfo>, RecordError> {
        let Some(psinfo) = read_struct::<PsinfoHead>(&proc_path.join("psinfo"))? else {
            return Ok(None);
        };
        let Some(usage) = read_struct::<Prusage>(&proc_path.join("usage"))? else {
            return Ok(None);
        };
        Ok(Some(psinfo_to_info(&psinfo, &usage)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::psinfo::tests::{sample_psinfo, sample_usage, struct_bytes};
    use tempfile::tempdir;

    fn units() -> Units {
        Units {
            page_size: 4096,
            clock_ticks: 100.0,
        }
    }

    // -------------------------------------------------------------------------
    // Tests for stat_to_info
    // -------------------------------------------------------------------------

    #[test]
    fn test_stat_to_info_normalizes() {
        let stat = ProcStat {
            pid: 1234,
            comm: "test_process".into(),
            state: 'S',
            ppid: 1,
            minflt: 100,
            majflt: 3,
            utime: 1000,
            stime: 500,
            priority: 20,
            vsize: 12_345_678,
            rss: 1234,
            ..Default::default()
        };
        let info = stat_to_info(&stat, &units()).unwrap();
        assert_eq!(info.id, 1234);
        assert_eq!(info.parentid, 1);
        assert_eq!(info.command, "test_process");
        assert_eq!(info.swap_size, 12_345_678.0);
        assert_eq!(info.working_set_size, 1234.0 * 4096.0);
        assert_eq!(info.page_fault_count, 103);
        assert!((info.user_time - 10.0).abs() < 1e-9);
        assert!((info.kernel_time - 5.0).abs() < 1e-9);
        assert!(!info.is_low_priority);
        assert!(!info.is_boinc_app);

        let nice19 = ProcStat {
            priority: 39,
            ..stat
        };
        assert!(stat_to_info(&nice19, &units()).unwrap().is_low_priority);
    }

    #[test]
    fn test_stat_to_info_rejects_out_of_range_ppid() {
        let stat = ProcStat {
            pid: 50,
            comm: "orphan".into(),
            ppid: i64::from(Pid::MAX) + 1,
            ..Default::default()
        };
        match stat_to_info(&stat, &units()) {
            Err(RecordError::Malformed { raw, detail }) => {
                assert_eq!(raw, "50 (orphan)");
                assert!(detail.contains("ppid"));
            }
            other => panic!("expected malformed record, got {:?}", other),
        }

        let negative = ProcStat {
            ppid: i64::from(Pid::MIN) - 1,
            ..stat
        };
        assert!(stat_to_info(&negative, &units()).is_err());
    }

    // -------------------------------------------------------------------------
    // Tests for StatFileSource
    // -------------------------------------------------------------------------

    #[test]
    fn test_stat_source_reads_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let stat_content = "1234 (test_process) S 1 1234 1234 0 -1 4194304 100 0 0 0 1000 500 0 0 20 0 1 0 12345 12345678 1234 18446744073709551615 4194304 4238788 140736466511168 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0 0 0 0 0 0 0 0 0\n";
        std::fs::write(dir.path().join("stat"), stat_content).expect("Failed to write stat file");

        let info = StatFileSource::new(units())
            .read_process(dir.path())
            .expect("record parses")
            .expect("record present");
        assert_eq!(info.id, 1234);
        assert!((info.user_time - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_stat_source_missing_file_is_skipped() {
        let dir = tempdir().expect("Failed to create temp dir");
        let result = StatFileSource::new(units()).read_process(dir.path());
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_stat_source_empty_file_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("stat"), "").unwrap();
        let result = StatFileSource::new(units()).read_process(dir.path());
        assert!(matches!(result, Err(RecordError::Empty)));
    }

    #[test]
    fn test_stat_source_non_utf8_comm() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut content = b"77 (bad\xffname) S 1".to_vec();
        for _ in 0..35 {
            content.extend_from_slice(b" 0");
        }
        std::fs::write(dir.path().join("stat"), content).unwrap();

        let info = StatFileSource::new(units())
            .read_process(dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(info.id, 77);
        assert!(info.command.starts_with("bad"));
    }

    // -------------------------------------------------------------------------
    // Tests for PsinfoSource
    // -------------------------------------------------------------------------

    #[test]
    fn test_psinfo_source_reads_both_structs() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("psinfo"), struct_bytes(&sample_psinfo(9, 1, "init"))).unwrap();
        std::fs::write(dir.path().join("usage"), struct_bytes(&sample_usage())).unwrap();

        let info = PsinfoSource.read_process(dir.path()).unwrap().unwrap();
        assert_eq!(info.id, 9);
        assert_eq!(info.command, "init");
        assert_eq!(info.working_set_size, 512.0 * 1024.0);
    }

    #[test]
    fn test_psinfo_source_truncated_usage() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("psinfo"), struct_bytes(&sample_psinfo(9, 1, "init"))).unwrap();
        let usage = struct_bytes(&sample_usage());
        std::fs::write(dir.path().join("usage"), &usage[..usage.len() / 2]).unwrap();

        let result = PsinfoSource.read_process(dir.path());
        assert!(matches!(result, Err(RecordError::Truncated { what: "usage", .. })));
    }

    #[test]
    fn test_psinfo_source_missing_usage_is_skipped() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("psinfo"), struct_bytes(&sample_psinfo(9, 1, "init"))).unwrap();
        assert!(matches!(PsinfoSource.read_process(dir.path()), Ok(None)));
    }
}
