//! Binary process records of the Solaris/illumos `/proc`.
//!
//! Each process directory carries `psinfo` (identity and sizes) and `usage`
//! (resource accounting) as fixed-layout C structures from `<procfs.h>`.
//! The layouts below mirror those headers field for field; a record is
//! accepted only when a full structure's worth of bytes could be read.

use libc::{c_char, c_int, c_long, c_ulong, c_ushort, dev_t, gid_t, pid_t, size_t, time_t, uid_t};
use std::mem::size_of;

use crate::error::RecordError;
use crate::process::info::{Pid, ProcessInfo};
use crate::process::units::{kb_to_bytes, timespec_to_seconds};

/// Length of `pr_fname`.
pub const PRFNSZ: usize = 16;

/// `timestruc_t`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestruc {
    pub tv_sec: time_t,
    pub tv_nsec: c_long,
}

impl Timestruc {
    pub fn as_seconds(&self) -> f64 {
        timespec_to_seconds(self.tv_sec as i64, self.tv_nsec as i64)
    }
}

/// Leading part of `psinfo_t`, up to and including `pr_fname`. The
/// remainder (argument string, zone ids, representative lwp) is not used.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PsinfoHead {
    pub pr_flag: c_int,
    pub pr_nlwp: c_int,
    pub pr_pid: pid_t,
    pub pr_ppid: pid_t,
    pub pr_pgid: pid_t,
    pub pr_sid: pid_t,
    pub pr_uid: uid_t,
    pub pr_euid: uid_t,
    pub pr_gid: gid_t,
    pub pr_egid: gid_t,
    pub pr_addr: usize,
    /// Size of the process image in KiB.
    pub pr_size: size_t,
    /// Resident set size in KiB.
    pub pr_rssize: size_t,
    pub pr_pad1: size_t,
    pub pr_ttydev: dev_t,
    pub pr_pctcpu: c_ushort,
    pub pr_pctmem: c_ushort,
    pub pr_start: Timestruc,
    pub pr_time: Timestruc,
    pub pr_ctime: Timestruc,
    pub pr_fname: [c_char; PRFNSZ],
}

/// `prusage_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Prusage {
    pub pr_lwpid: c_int,
    pub pr_count: c_int,
    pub pr_tstamp: Timestruc,
    pub pr_create: Timestruc,
    pub pr_term: Timestruc,
    pub pr_rtime: Timestruc,
    pub pr_utime: Timestruc,
    pub pr_stime: Timestruc,
    pub pr_ttime: Timestruc,
    pub pr_tftime: Timestruc,
    pub pr_dftime: Timestruc,
    pub pr_kftime: Timestruc,
    pub pr_ltime: Timestruc,
    pub pr_slptime: Timestruc,
    pub pr_wtime: Timestruc,
    pub pr_stoptime: Timestruc,
    pub filltime: [Timestruc; 6],
    pub pr_minf: c_ulong,
    pub pr_majf: c_ulong,
    pub pr_nswap: c_ulong,
    pub pr_inblk: c_ulong,
    pub pr_oublk: c_ulong,
    pub pr_msnd: c_ulong,
    pub pr_mrcv: c_ulong,
    pub pr_sigs: c_ulong,
    pub pr_vctx: c_ulong,
    pub pr_ictx: c_ulong,
    pub pr_sysc: c_ulong,
    pub pr_ioch: c_ulong,
    pub filler: [c_ulong; 10],
}

/// Kernel structures that may be decoded straight from bytes.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` and built only from integers and
/// arrays of integers, so that every bit pattern is a valid value.
pub unsafe trait KernelStruct: Copy {
    /// File the structure is read from, for diagnostics.
    const SOURCE: &'static str;
}

// SAFETY: repr(C), integer and integer-array fields only.
unsafe impl KernelStruct for PsinfoHead {
    const SOURCE: &'static str = "psinfo";
}

// SAFETY: repr(C), integer and integer-array fields only.
unsafe impl KernelStruct for Prusage {
    const SOURCE: &'static str = "usage";
}

/// Decodes `T` from the start of `buf`, which must hold at least
/// `size_of::<T>()` bytes.
pub fn decode<T: KernelStruct>(buf: &[u8]) -> Result<T, RecordError> {
    let expected = size_of::<T>();
    if buf.len() < expected {
        return Err(RecordError::Truncated {
            what: T::SOURCE,
            expected,
            got: buf.len(),
        });
    }
    // SAFETY: length checked above, T is plain old data (KernelStruct) and
    // read_unaligned has no alignment requirement on the source pointer.
    Ok(unsafe { std::ptr::read_unaligned(buf.as_ptr().cast::<T>()) })
}

/// NUL-terminated `pr_fname` to a string.
pub fn fname_to_string(fname: &[c_char; PRFNSZ]) -> String {
    let bytes: Vec<u8> = fname
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Builds the normalized record from the two structures. Sizes arrive in
/// KiB, times as seconds + nanoseconds. Family flags are left to the caller.
pub fn psinfo_to_info(ps: &PsinfoHead, usage: &Prusage) -> ProcessInfo {
    let mut p = ProcessInfo {
        id: ps.pr_pid as Pid,
        parentid: ps.pr_ppid as Pid,
        swap_size: kb_to_bytes(ps.pr_size as u64),
        working_set_size: kb_to_bytes(ps.pr_rssize as u64),
        user_time: usage.pr_utime.as_seconds(),
        kernel_time: usage.pr_stime.as_seconds(),
        // page faults: I/O + non I/O
        page_fault_count: (usage.pr_majf as u64).saturating_add(usage.pr_minf as u64),
        ..Default::default()
    };
    p.set_command(&fname_to_string(&ps.pr_fname));
    p
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Raw bytes of a zero-initialized structure, as the kernel would hand them out.
    pub(crate) fn struct_bytes<T: KernelStruct>(value: &T) -> Vec<u8> {
        // SAFETY: T is plain old data; callers build values from mem::zeroed
        // so padding bytes are initialized.
        unsafe {
            std::slice::from_raw_parts((value as *const T).cast::<u8>(), size_of::<T>()).to_vec()
        }
    }

    pub(crate) fn sample_psinfo(pid: pid_t, ppid: pid_t, fname: &str) -> PsinfoHead {
        // SAFETY: all-zero is a valid PsinfoHead (KernelStruct)
        let mut ps: PsinfoHead = unsafe { std::mem::zeroed() };
        ps.pr_pid = pid;
        ps.pr_ppid = ppid;
        ps.pr_size = 2048;
        ps.pr_rssize = 512;
        for (dst, src) in ps.pr_fname.iter_mut().zip(fname.bytes().take(PRFNSZ - 1)) {
            *dst = src as c_char;
        }
        ps
    }

    pub(crate) fn sample_usage() -> Prusage {
        // SAFETY: all-zero is a valid Prusage (KernelStruct)
        let mut usage: Prusage = unsafe { std::mem::zeroed() };
        usage.pr_utime = Timestruc {
            tv_sec: 12,
            tv_nsec: 500_000_000,
        };
        usage.pr_stime = Timestruc {
            tv_sec: 3,
            tv_nsec: 250_000_000,
        };
        usage.pr_minf = 40;
        usage.pr_majf = 2;
        usage
    }

    #[test]
    fn test_decode_roundtrips_struct_bytes() {
        let ps = sample_psinfo(77, 1, "boincmgr");
        let decoded: PsinfoHead = decode(&struct_bytes(&ps)).unwrap();
        assert_eq!(decoded.pr_pid, 77);
        assert_eq!(decoded.pr_ppid, 1);
        assert_eq!(fname_to_string(&decoded.pr_fname), "boincmgr");
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let bytes = struct_bytes(&sample_usage());
        match decode::<Prusage>(&bytes[..bytes.len() - 1]) {
            Err(RecordError::Truncated {
                what,
                expected,
                got,
            }) => {
                assert_eq!(what, "usage");
                assert_eq!(expected, size_of::<Prusage>());
                assert_eq!(got, expected - 1);
            }
            other => panic!("expected truncated read, got {:?}", other.map(|_| ())),
        }
        assert!(decode::<PsinfoHead>(&[]).is_err());
    }

    #[test]
    fn test_psinfo_to_info_normalizes_units() {
        let info = psinfo_to_info(&sample_psinfo(77, 1, "sshd"), &sample_usage());
        assert_eq!(info.id, 77);
        assert_eq!(info.parentid, 1);
        assert_eq!(info.command, "sshd");
        assert_eq!(info.swap_size, 2048.0 * 1024.0);
        assert_eq!(info.working_set_size, 512.0 * 1024.0);
        assert!((info.user_time - 12.5).abs() < 1e-9);
        assert!((info.kernel_time - 3.25).abs() < 1e-9);
        assert_eq!(info.page_fault_count, 42);
        assert!(!info.is_low_priority);
    }

    #[test]
    fn test_fname_without_terminator() {
        let mut ps = sample_psinfo(1, 0, "");
        ps.pr_fname = [b'a' as c_char; PRFNSZ];
        assert_eq!(fname_to_string(&ps.pr_fname), "a".repeat(PRFNSZ));
    }
}
