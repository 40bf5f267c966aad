//! Text rendering of snapshots, lineage trees and totals.

use ahash::AHashSet;
use procsnap::{Pid, ProcessInfo, ProcessSnapshot, ResourceTotals};
use std::fmt::Write;

/// Formats bytes as human-readable string (KB, MB, GB).
pub fn format_bytes(bytes: f64) -> String {
    if bytes >= 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else if bytes >= 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else {
        format!("{} B", bytes as u64)
    }
}

fn flags(p: &ProcessInfo) -> String {
    let mut f = String::new();
    if p.is_boinc_app {
        f.push('A');
    }
    if p.is_low_priority {
        f.push('N');
    }
    if f.is_empty() {
        f.push('-');
    }
    f
}

/// One row per process, ordered by pid.
pub fn render_table(snapshot: &ProcessSnapshot) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{:>7} {:>7} {:>10} {:>10} {:>11} {:>11} {:>10} {:>5}  COMMAND",
        "PID", "PPID", "USER(s)", "SYS(s)", "RSS", "VSZ", "FAULTS", "FLAGS"
    )
    .ok();
    for p in snapshot {
        writeln!(
            out,
            "{:>7} {:>7} {:>10.2} {:>10.2} {:>11} {:>11} {:>10} {:>5}  {}",
            p.id,
            p.parentid,
            p.user_time,
            p.kernel_time,
            format_bytes(p.working_set_size),
            format_bytes(p.swap_size),
            p.page_fault_count,
            flags(p),
            p.command
        )
        .ok();
    }
    out
}

/// Pids whose parent is not in the snapshot (or is themselves).
pub fn tree_roots(snapshot: &ProcessSnapshot) -> Vec<Pid> {
    snapshot
        .iter()
        .filter(|p| p.parentid == p.id || !snapshot.contains(p.parentid))
        .map(|p| p.id)
        .collect()
}

/// Indented lineage tree below each of `roots`. Expects child lists to be
/// filled; a pid reached twice is printed once.
pub fn render_tree(snapshot: &ProcessSnapshot, roots: &[Pid]) -> String {
    let mut out = String::new();
    let mut seen = AHashSet::new();
    render_subtrees(snapshot, roots, &mut seen, &mut out);
    out
}

/// Every process of the snapshot as a forest. Pids caught in a parent cycle
/// have no root above them and are printed as extra roots, lowest pid first.
pub fn render_forest(snapshot: &ProcessSnapshot) -> String {
    let mut out = String::new();
    let mut seen = AHashSet::new();
    render_subtrees(snapshot, &tree_roots(snapshot), &mut seen, &mut out);
    for pid in snapshot.pids() {
        if !seen.contains(&pid) {
            render_subtrees(snapshot, &[pid], &mut seen, &mut out);
        }
    }
    out
}

fn render_subtrees(
    snapshot: &ProcessSnapshot,
    roots: &[Pid],
    seen: &mut AHashSet<Pid>,
    out: &mut String,
) {
    let mut stack: Vec<(Pid, usize)> = roots.iter().rev().map(|&p| (p, 0)).collect();

    while let Some((pid, depth)) = stack.pop() {
        if !seen.insert(pid) {
            continue;
        }
        let Some(p) = snapshot.get(pid) else {
            continue;
        };
        writeln!(
            out,
            "{}{} {} ({:.2}s, {})",
            "  ".repeat(depth),
            p.id,
            p.command,
            p.cpu_time(),
            format_bytes(p.working_set_size)
        )
        .ok();
        for &child in p.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

/// Two-line summary of a set of totals.
pub fn render_totals(label: &str, t: &ResourceTotals) -> String {
    let mut out = String::new();
    writeln!(out, "{} ({} processes)", label, t.process_count).ok();
    writeln!(
        out,
        "   ├─ CPU: {:.2}s user, {:.2}s system, {} faults",
        t.user_time, t.kernel_time, t.page_fault_count
    )
    .ok();
    writeln!(
        out,
        "   └─ Memory: {} resident, {} virtual",
        format_bytes(t.working_set_size),
        format_bytes(t.swap_size)
    )
    .ok();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use procsnap::find_children;

    fn proc(id: Pid, parentid: Pid, command: &str) -> ProcessInfo {
        ProcessInfo {
            id,
            parentid,
            command: command.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(1023.0), "1023 B");
        assert_eq!(format_bytes(2048.0), "2.00 KB");
        assert_eq!(format_bytes(5.0 * 1024.0 * 1024.0), "5.00 MB");
        assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0 * 1024.0), "3.00 GB");
    }

    #[test]
    fn test_render_table_has_row_per_process() {
        let mut app = proc(10, 1, "boinc");
        app.is_boinc_app = true;
        let snap: ProcessSnapshot = [proc(1, 0, "init"), app].into_iter().collect();
        let table = render_table(&snap);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("PID"));
        assert!(lines[1].ends_with("init"));
        assert!(lines[2].contains(" A "));
    }

    #[test]
    fn test_render_tree_indents_children() {
        let mut snap: ProcessSnapshot = [
            proc(1, 0, "init"),
            proc(2, 1, "sshd"),
            proc(3, 2, "bash"),
            proc(4, 1, "cron"),
        ]
        .into_iter()
        .collect();
        find_children(&mut snap);

        assert_eq!(tree_roots(&snap), vec![1]);
        let tree = render_tree(&snap, &tree_roots(&snap));
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1 init"));
        assert!(lines[1].starts_with("  2 sshd"));
        assert!(lines[2].starts_with("    3 bash"));
        assert!(lines[3].starts_with("  4 cron"));
    }

    #[test]
    fn test_render_forest_includes_parent_cycles() {
        let mut snap: ProcessSnapshot = [
            proc(1, 0, "init"),
            proc(2, 3, "racer"),
            proc(3, 2, "recycled"),
            proc(4, 1, "cron"),
        ]
        .into_iter()
        .collect();
        find_children(&mut snap);

        assert_eq!(tree_roots(&snap), vec![1]);
        let forest = render_forest(&snap);
        let lines: Vec<&str> = forest.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1 init"));
        assert!(lines[1].starts_with("  4 cron"));
        assert!(lines[2].starts_with("2 racer"));
        assert!(lines[3].starts_with("  3 recycled"));
    }
}
