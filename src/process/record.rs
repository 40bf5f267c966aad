//! Parser for the Linux `/proc/<pid>/stat` record.
//!
//! Format: `pid (comm) state ppid pgrp session tty_nr tpgid flags minflt ...`
//!
//! The comm field is the first 15 bytes of the executable name and may
//! itself contain spaces, digits and parentheses, so it is taken from the
//! first `(` to the last `)`. Everything else is positional and
//! whitespace-delimited. See `fs/proc/array.c` in the kernel tree.

use crate::error::RecordError;
use crate::process::info::Pid;

/// Number of fields decoded from every record.
pub const STAT_FIELD_COUNT: usize = 39;

/// Total field counts of the stat line across kernel ABI revisions.
///
/// 39 (exit_signal, processor), 41 (+rt_priority, policy),
/// 42 (+delayacct_blkio_ticks), 44 (+guest_time, cguest_time),
/// 47 (+start_data, end_data, start_brk), 52 (+arg/env bounds, exit_code).
/// The first 39 fields never move between revisions.
pub const KNOWN_STAT_FIELD_COUNTS: [usize; 6] = [39, 41, 42, 44, 47, 52];

/// Longest stat line the reader will accept.
pub const MAX_STAT_LINE: usize = 4096;

/// Raw `/proc/<pid>/stat` fields in kernel order. Times are in clock ticks,
/// `rss` is in pages and `vsize` in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcStat {
    pub pid: Pid,
    pub comm: String,
    pub state: char,
    pub ppid: i64,
    pub pgrp: i64,
    pub session: i64,
    pub tty_nr: i64,
    pub tpgid: i64,
    pub flags: u64,
    pub minflt: u64,
    pub cminflt: u64,
    pub majflt: u64,
    pub cmajflt: u64,
    pub utime: u64,
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: i64,
    pub itrealvalue: i64,
    pub starttime: u64,
    pub vsize: u64,
    pub rss: i64,
    pub rsslim: u64,
    pub startcode: u64,
    pub endcode: u64,
    pub startstack: u64,
    pub kstkesp: u64,
    pub kstkeip: u64,
    pub signal: u64,
    pub blocked: u64,
    pub sigignore: u64,
    pub sigcatch: u64,
    pub wchan: u64,
    pub nswap: u64,
    pub cnswap: u64,
    pub exit_signal: i64,
    pub processor: i64,
}

/// Positional cursor over the whitespace-separated tail of a stat line.
struct Fields<'a> {
    raw: &'a str,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn next_token(&mut self, name: &str) -> Result<&'a str, RecordError> {
        self.tokens
            .next()
            .ok_or_else(|| RecordError::malformed(self.raw, format!("missing field {}", name)))
    }

    fn signed(&mut self, name: &str) -> Result<i64, RecordError> {
        let tok = self.next_token(name)?;
        tok.parse()
            .map_err(|_| RecordError::malformed(self.raw, format!("invalid {}: {:?}", name, tok)))
    }

    fn unsigned(&mut self, name: &str) -> Result<u64, RecordError> {
        let tok = self.next_token(name)?;
        tok.parse()
            .map_err(|_| RecordError::malformed(self.raw, format!("invalid {}: {:?}", name, tok)))
    }

    fn state(&mut self) -> Result<char, RecordError> {
        let tok = self.next_token("state")?;
        let mut chars = tok.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(RecordError::malformed(
                self.raw,
                format!("invalid state: {:?}", tok),
            )),
        }
    }
}

/// Parses one stat line. Only the first line of `content` is considered.
///
/// The line must carry exactly one of [`KNOWN_STAT_FIELD_COUNTS`] fields;
/// anything else is rejected rather than partially decoded.
pub fn parse_stat_line(content: &str) -> Result<ProcStat, RecordError> {
    let line = content.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Err(RecordError::Empty);
    }

    let open = line
        .find('(')
        .ok_or_else(|| RecordError::malformed(line, "missing '('"))?;
    let close = line
        .rfind(')')
        .ok_or_else(|| RecordError::malformed(line, "missing ')'"))?;
    if close < open {
        return Err(RecordError::malformed(line, "unbalanced parentheses"));
    }

    let pid: Pid = line[..open]
        .trim()
        .parse()
        .map_err(|_| RecordError::malformed(line, "invalid pid"))?;
    let comm = &line[open + 1..close];
    let rest = &line[close + 1..];

    let total = 2 + rest.split_whitespace().count();
    if !KNOWN_STAT_FIELD_COUNTS.contains(&total) {
        return Err(RecordError::malformed(
            line,
            format!(
                "expected one of {:?} fields, got {}",
                KNOWN_STAT_FIELD_COUNTS, total
            ),
        ));
    }

    let mut f = Fields {
        raw: line,
        tokens: rest.split_whitespace(),
    };

    Ok(ProcStat {
        pid,
        comm: comm.to_string(),
        state: f.state()?,
        ppid: f.signed("ppid")?,
        pgrp: f.signed("pgrp")?,
        session: f.signed("session")?,
        tty_nr: f.signed("tty_nr")?,
        tpgid: f.signed("tpgid")?,
        flags: f.unsigned("flags")?,
        minflt: f.unsigned("minflt")?,
        cminflt: f.unsigned("cminflt")?,
        majflt: f.unsigned("majflt")?,
        cmajflt: f.unsigned("cmajflt")?,
        utime: f.unsigned("utime")?,
        stime: f.unsigned("stime")?,
        cutime: f.signed("cutime")?,
        cstime: f.signed("cstime")?,
        priority: f.signed("priority")?,
        nice: f.signed("nice")?,
        num_threads: f.signed("num_threads")?,
        itrealvalue: f.signed("itrealvalue")?,
        starttime: f.unsigned("starttime")?,
        vsize: f.unsigned("vsize")?,
        rss: f.signed("rss")?,
        rsslim: f.unsigned("rsslim")?,
        startcode: f.unsigned("startcode")?,
        endcode: f.unsigned("endcode")?,
        startstack: f.unsigned("startstack")?,
        kstkesp: f.unsigned("kstkesp")?,
        kstkeip: f.unsigned("kstkeip")?,
        signal: f.unsigned("signal")?,
        blocked: f.unsigned("blocked")?,
        sigignore: f.unsigned("sigignore")?,
        sigcatch: f.unsigned("sigcatch")?,
        wchan: f.unsigned("wchan")?,
        nswap: f.unsigned("nswap")?,
        cnswap: f.unsigned("cnswap")?,
        exit_signal: f.signed("exit_signal")?,
        processor: f.signed("processor")?,
    })
}
