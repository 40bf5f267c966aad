//! Normalized per-process data and the snapshot that holds it.

use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Process identifier as reported by the kernel.
pub type Pid = i32;

/// Upper bound on the stored command name, in bytes.
pub const COMMAND_MAX_LEN: usize = 255;

/// One process, with every size in bytes and every time in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub id: Pid,
    pub parentid: Pid,
    pub command: String,
    pub swap_size: f64,
    pub working_set_size: f64,
    pub page_fault_count: u64,
    pub user_time: f64,
    pub kernel_time: f64,
    pub is_boinc_app: bool,
    pub is_low_priority: bool,
    /// Direct children, ascending. Filled by [`crate::process::lineage::find_children`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Pid>,
}

impl ProcessInfo {
    /// Stores `name` as the command, cut at [`COMMAND_MAX_LEN`] on a char boundary.
    pub fn set_command(&mut self, name: &str) {
        let mut end = name.len().min(COMMAND_MAX_LEN);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        self.command = name[..end].to_string();
    }

    pub fn cpu_time(&self) -> f64 {
        self.user_time + self.kernel_time
    }
}

/// All processes seen by one scan, keyed and ordered by pid.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProcessSnapshot {
    processes: BTreeMap<Pid, ProcessInfo>,
}

impl ProcessSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts keyed by `info.id`, replacing any earlier entry for that pid.
    pub fn insert(&mut self, info: ProcessInfo) -> Option<ProcessInfo> {
        self.processes.insert(info.id, info)
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessInfo> {
        self.processes.get(&pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.processes.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Values<'_, Pid, ProcessInfo> {
        self.processes.values()
    }

    // Mutable access is crate-private so that callers outside the lineage
    // step cannot rekey or drop entries.
    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessInfo> {
        self.processes.get_mut(&pid)
    }

    pub(crate) fn iter_mut(&mut self) -> btree_map::ValuesMut<'_, Pid, ProcessInfo> {
        self.processes.values_mut()
    }
}

impl<'a> IntoIterator for &'a ProcessSnapshot {
    type Item = &'a ProcessInfo;
    type IntoIter = btree_map::Values<'a, Pid, ProcessInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ProcessInfo> for ProcessSnapshot {
    fn from_iter<I: IntoIterator<Item = ProcessInfo>>(iter: I) -> Self {
        let mut snapshot = ProcessSnapshot::new();
        for info in iter {
            snapshot.insert(info);
        }
        snapshot
    }
}
