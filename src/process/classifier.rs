//! Semantic flags derived from a normalized record.

use crate::process::info::Pid;

/// Default application family matched against command names.
pub const DEFAULT_APP_FAMILY: &str = "boinc";

/// Raw Linux `priority` of a process at nice 19.
///
/// The kernel stores priority as `nice + 20` so that negative values stay
/// free for error codes, giving a user range of 0..=39.
pub const LINUX_LOWEST_PRIORITY: i64 = 39;

/// True if the process is the monitor itself, or its command contains
/// `family` ignoring ASCII case. An empty family matches nothing.
pub fn is_app_process(pid: Pid, command: &str, own_pid: Pid, family: &str) -> bool {
    if pid == own_pid {
        return true;
    }
    if family.is_empty() {
        return false;
    }
    command
        .to_ascii_lowercase()
        .contains(&family.to_ascii_lowercase())
}

/// True only for the lowest user-visible priority on Linux.
pub fn is_linux_low_priority(priority: i64) -> bool {
    priority == LINUX_LOWEST_PRIORITY
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Tests for is_app_process
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_process_by_own_pid() {
        assert!(is_app_process(500, "bash", 500, DEFAULT_APP_FAMILY));
        assert!(!is_app_process(501, "bash", 500, DEFAULT_APP_FAMILY));
    }

    #[test]
    fn test_app_process_by_name_any_case() {
        let own = 1;
        assert!(is_app_process(10, "boinc", own, "boinc"));
        assert!(is_app_process(10, "BOINC", own, "boinc"));
        assert!(is_app_process(10, "myBoInCclient", own, "boinc"));
        assert!(is_app_process(10, "setiathome_boincApp", own, "BoInC"));
        assert!(!is_app_process(10, "boin", own, "boinc"));
        assert!(!is_app_process(10, "b o i n c", own, "boinc"));
        assert!(!is_app_process(10, "nginx", own, "boinc"));
    }

    #[test]
    fn test_app_process_empty_family() {
        assert!(!is_app_process(10, "boinc", 1, ""));
        assert!(is_app_process(1, "boinc", 1, ""));
    }

    // -------------------------------------------------------------------------
    // Tests for is_linux_low_priority
    // -------------------------------------------------------------------------

    #[test]
    fn test_low_priority_only_at_sentinel() {
        assert!(is_linux_low_priority(39));
        assert!(!is_linux_low_priority(38));
        assert!(!is_linux_low_priority(40));
        assert!(!is_linux_low_priority(20));
        assert!(!is_linux_low_priority(0));
        assert!(!is_linux_low_priority(-39));
    }
}
