//! Process lineage over a snapshot: child lists and resource roll-ups.
//!
//! These functions may augment entries (child lists, family flags) but
//! never add, remove or rekey them.

use ahash::AHashSet as HashSet;
use serde::Serialize;
use tracing::debug;

use crate::process::info::{Pid, ProcessSnapshot};

/// Summed resource usage of a group of processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResourceTotals {
    pub user_time: f64,
    pub kernel_time: f64,
    pub swap_size: f64,
    pub working_set_size: f64,
    pub page_fault_count: u64,
    pub process_count: usize,
}

impl ResourceTotals {
    pub fn cpu_time(&self) -> f64 {
        self.user_time + self.kernel_time
    }
}

/// Fills every entry's `children` from the other entries' `parentid`.
///
/// Parents missing from the snapshot and self-parenting entries (pid 0 on
/// some kernels) are ignored. Child lists come out ascending.
pub fn find_children(snapshot: &mut ProcessSnapshot) {
    for p in snapshot.iter_mut() {
        p.children.clear();
    }

    // Snapshot iteration is ordered by pid, so pushes keep lists sorted.
    let links: Vec<(Pid, Pid)> = snapshot
        .iter()
        .filter(|p| p.parentid != p.id)
        .map(|p| (p.parentid, p.id))
        .collect();

    for (parent, child) in links {
        if let Some(pp) = snapshot.get_mut(parent) {
            pp.children.push(child);
        }
    }
}

/// All descendants of `pid` (not including `pid`), breadth first.
///
/// Requires [`find_children`] to have run. Cycles are cut at the first
/// revisit.
pub fn descendants(snapshot: &ProcessSnapshot, pid: Pid) -> Vec<Pid> {
    let mut out = Vec::new();
    let mut seen: HashSet<Pid> = HashSet::new();
    seen.insert(pid);

    let mut queue = std::collections::VecDeque::from([pid]);
    while let Some(current) = queue.pop_front() {
        let Some(p) = snapshot.get(current) else {
            continue;
        };
        for &child in &p.children {
            if seen.insert(child) {
                out.push(child);
                queue.push_back(child);
            } else {
                debug!("lineage cycle at pid {} -> {}", current, child);
            }
        }
    }
    out
}

/// Resource totals of an application instance: `pid`, any `other_pids`
/// belonging to it, and all their descendants.
///
/// CPU time and fault counts are summed over everything. Memory of the
/// listed processes is summed, but descendants contribute only the largest
/// single swap and working-set size seen, since helper processes usually
/// share most of their pages with the parent. Every counted process is
/// flagged `is_boinc_app`. Returns `None` if `pid` is not in the snapshot.
pub fn app_totals(
    snapshot: &mut ProcessSnapshot,
    pid: Pid,
    other_pids: &[Pid],
) -> Option<ResourceTotals> {
    if !snapshot.contains(pid) {
        return None;
    }

    let mut totals = ResourceTotals::default();
    let mut counted: HashSet<Pid> = HashSet::new();

    let roots: Vec<Pid> = std::iter::once(pid)
        .chain(other_pids.iter().copied())
        .filter(|p| snapshot.contains(*p))
        .collect();

    for &root in &roots {
        if !counted.insert(root) {
            continue;
        }
        if let Some(p) = snapshot.get_mut(root) {
            totals.user_time += p.user_time;
            totals.kernel_time += p.kernel_time;
            totals.swap_size += p.swap_size;
            totals.working_set_size += p.working_set_size;
            totals.page_fault_count += p.page_fault_count;
            totals.process_count += 1;
            p.is_boinc_app = true;
        }
    }

    for &root in &roots {
        for child in descendants(snapshot, root) {
            if !counted.insert(child) {
                continue;
            }
            if let Some(p) = snapshot.get_mut(child) {
                totals.user_time += p.user_time;
                totals.kernel_time += p.kernel_time;
                totals.page_fault_count += p.page_fault_count;
                totals.swap_size = totals.swap_size.max(p.swap_size);
                totals.working_set_size = totals.working_set_size.max(p.working_set_size);
                totals.process_count += 1;
                p.is_boinc_app = true;
            }
        }
    }

    Some(totals)
}

/// Totals over every process that is not part of the application family,
/// not running at the lowest priority, and not pid 0.
pub fn non_app_totals(snapshot: &ProcessSnapshot) -> ResourceTotals {
    snapshot
        .iter()
        .filter(|p| !p.is_boinc_app && !p.is_low_priority && p.id != 0)
        .fold(ResourceTotals::default(), |mut t, p| {
            t.user_time += p.user_time;
            t.kernel_time += p.kernel_time;
            t.swap_size += p.swap_size;
            t.working_set_size += p.working_set_size;
            t.page_fault_count += p.page_fault_count;
            t.process_count += 1;
            t
        })
}
