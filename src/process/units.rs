//! Host unit queries used to normalize raw records.
//!
//! Linux reports CPU time in clock ticks and resident memory in pages. Both
//! rates are read from the host; the historical constants are only a
//! fallback when `sysconf` has no answer.

use once_cell::sync::Lazy;

/// Tick rate assumed when `sysconf(_SC_CLK_TCK)` is unavailable.
pub const FALLBACK_CLK_TCK: f64 = 100.0;

/// Page size assumed when `sysconf(_SC_PAGESIZE)` is unavailable.
pub const FALLBACK_PAGE_SIZE: u64 = 4096;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    // SAFETY: sysconf is safe to call with _SC_CLK_TCK
    // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
    let tck = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if tck > 0 {
        tck as f64
    } else {
        FALLBACK_CLK_TCK
    }
}

/// Get the host memory page size in bytes.
fn get_page_size() -> u64 {
    // SAFETY: sysconf is safe to call with _SC_PAGESIZE; errors are -1
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        FALLBACK_PAGE_SIZE
    }
}

/// System clock ticks per second (for CPU time calculation).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// System page size in bytes (for resident set size calculation).
pub static PAGE_SIZE: Lazy<u64> = Lazy::new(get_page_size);

/// Conversion factors applied to one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    pub page_size: u64,
    pub clock_ticks: f64,
}

impl Units {
    /// Rates reported by the running host.
    pub fn host() -> Self {
        Self {
            page_size: *PAGE_SIZE,
            clock_ticks: *CLK_TCK,
        }
    }

    /// Pages to bytes.
    pub fn pages_to_bytes(&self, pages: i64) -> f64 {
        pages as f64 * self.page_size as f64
    }

    /// Clock ticks to seconds.
    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 / self.clock_ticks
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::host()
    }
}

/// Kilobytes to bytes.
pub fn kb_to_bytes(kb: u64) -> f64 {
    kb as f64 * 1024.0
}

/// A `timespec`-style pair to fractional seconds.
pub fn timespec_to_seconds(sec: i64, nsec: i64) -> f64 {
    sec as f64 + nsec as f64 / 1e9
}
