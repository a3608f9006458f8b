//! Error type shared by the repair pipeline and the project-file readers.

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that reject a whole repair run or project file.
///
/// Per-marker failures (a marker with no usable visible frame, a degenerate
/// refinement window, a gap that is too long) are *not* errors; they show up
/// as `None` samples and in [`RepairStats`](crate::RepairStats).
#[derive(Debug)]
pub enum RepairError {
    /// Input arrays disagree on frame count, marker count or image size.
    MalformedInput {
        /// Which input was inconsistent.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Observed size.
        got: usize,
    },
    /// A configuration value cannot be used.
    InvalidConfig(String),
    /// A frame-indexed project document has no entry for this frame.
    MissingFrame(usize),
    /// Project file could not be parsed or encoded.
    Json(serde_json::Error),
    /// Project file could not be read or written.
    Io(std::io::Error),
}

impl RepairError {
    pub(crate) fn malformed(what: &'static str, expected: usize, got: usize) -> Self {
        Self::MalformedInput {
            what,
            expected,
            got,
        }
    }
}

impl std::fmt::Display for RepairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput {
                what,
                expected,
                got,
            } => write!(f, "malformed input: {}: expected {}, got {}", what, expected, got),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            Self::MissingFrame(i) => write!(f, "project document has no entry Frame{}", i),
            Self::Json(e) => write!(f, "json: {}", e),
            Self::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl std::error::Error for RepairError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RepairError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for RepairError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
