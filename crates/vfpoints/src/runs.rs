//! Run-length labeling of per-frame visibility classes.
//!
//! A trajectory's class sequence is scanned once for maximal runs of
//! non-visible frames. A run bounded by visible frames on both sides and no
//! longer than [`RunConfig::max_gap`] becomes [`RunLabel::Interpolate`];
//! every other non-visible frame becomes [`RunLabel::Unrecoverable`].

use serde::{Deserialize, Serialize};

/// Per-frame visibility class produced by the external classifier.
///
/// Integer codes match the labels stored in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityClass {
    /// No laser reflection could be identified.
    Unidentifiable = 0,
    /// The marker is drowned in a specular highlight.
    Specular = 1,
    /// The marker is clearly visible; its detection is trusted.
    Visible = 2,
}

impl VisibilityClass {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unidentifiable),
            1 => Some(Self::Specular),
            2 => Some(Self::Visible),
            _ => None,
        }
    }

    /// Parse one character: `V`/`S`/`U` or the digit codes `2`/`1`/`0`.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'V' | '2' => Some(Self::Visible),
            'S' | '1' => Some(Self::Specular),
            'U' | '0' => Some(Self::Unidentifiable),
            _ => None,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

/// Derived per-frame tag driving the repair stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunLabel {
    /// Trusted detection, refined to sub-pixel precision.
    #[serde(rename = "V")]
    Visible,
    /// Short gap between two visible frames, filled by interpolation.
    #[serde(rename = "I")]
    Interpolate,
    /// Cannot be reconstructed; left unresolved.
    #[serde(rename = "E")]
    Unrecoverable,
}

impl RunLabel {
    pub fn as_char(self) -> char {
        match self {
            Self::Visible => 'V',
            Self::Interpolate => 'I',
            Self::Unrecoverable => 'E',
        }
    }
}

impl std::fmt::Display for RunLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Run-labeling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Longest non-visible run (in frames) that is still interpolated.
    pub max_gap: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { max_gap: 5 }
    }
}

/// Number of frames carrying each label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub visible: usize,
    pub interpolate: usize,
    pub unrecoverable: usize,
}

impl RunCounts {
    pub fn from_labels(labels: &[RunLabel]) -> Self {
        let mut counts = Self::default();
        for label in labels {
            match label {
                RunLabel::Visible => counts.visible += 1,
                RunLabel::Interpolate => counts.interpolate += 1,
                RunLabel::Unrecoverable => counts.unrecoverable += 1,
            }
        }
        counts
    }
}

/// Label every frame of one trajectory.
///
/// Single linear pass: each maximal non-visible run is inspected once. Only
/// visible frames act as run boundaries, so the result does not depend on the
/// order in which runs are visited and re-running it is a no-op.
pub fn encode_runs(classes: &[VisibilityClass], max_gap: usize) -> Vec<RunLabel> {
    let n = classes.len();
    let mut labels: Vec<RunLabel> = classes
        .iter()
        .map(|c| {
            if c.is_visible() {
                RunLabel::Visible
            } else {
                RunLabel::Unrecoverable
            }
        })
        .collect();

    let mut t = 0;
    while t < n {
        if labels[t] == RunLabel::Visible {
            t += 1;
            continue;
        }
        let start = t;
        while t < n && labels[t] != RunLabel::Visible {
            t += 1;
        }
        // [start, t) is a maximal non-visible run.
        let bounded = start > 0 && t < n;
        if bounded && t - start <= max_gap {
            labels[start..t].fill(RunLabel::Interpolate);
        }
    }

    labels
}
