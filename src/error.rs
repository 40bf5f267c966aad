//! Error types for record parsing and the aggregate scan status.

/// Failure to turn one process record into a [`crate::ProcessInfo`].
///
/// A scan never aborts on these; they are logged and folded into the
/// scan's [`ScanStatus`].
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("can't parse stat record ({detail}): {raw}")]
    Malformed { raw: String, detail: String },

    #[error("short read of {what}: expected {expected} bytes, got {got}")]
    Truncated {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("empty record")]
    Empty,
}

impl RecordError {
    pub(crate) fn malformed(raw: &str, detail: impl Into<String>) -> Self {
        RecordError::Malformed {
            raw: raw.to_string(),
            detail: detail.into(),
        }
    }

    /// Coarse classification reported through [`ScanStatus`].
    pub fn kind(&self) -> FailureKind {
        match self {
            RecordError::Malformed { .. } => FailureKind::Malformed,
            RecordError::Truncated { .. } => FailureKind::Truncated,
            RecordError::Empty => FailureKind::Empty,
        }
    }
}

/// Class of the last record failure seen during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Malformed,
    Truncated,
    Empty,
}

impl FailureKind {
    /// Stable numeric status code for this failure class.
    pub fn code(self) -> i32 {
        match self {
            FailureKind::Malformed => 1,
            FailureKind::Truncated => 2,
            FailureKind::Empty => -116,
        }
    }
}

/// Aggregate outcome of one scan. Diagnostic only: a partial scan still
/// returns every record that parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStatus {
    #[default]
    Complete,
    Partial(FailureKind),
}

impl ScanStatus {
    /// Zero when every accessible entry parsed, otherwise the last failure's code.
    pub fn code(self) -> i32 {
        match self {
            ScanStatus::Complete => 0,
            ScanStatus::Partial(kind) => kind.code(),
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, ScanStatus::Complete)
    }
}
