use crate::runs::RunLabel;
use crate::TrackTable;

/// Aggregate counters of one repair run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepairStats {
    /// Number of markers processed.
    pub n_markers: usize,
    /// Number of frames per trajectory.
    pub n_frames: usize,
    /// Frames labeled visible, summed over markers.
    pub n_visible: usize,
    /// Visible frames that produced a sub-pixel position.
    pub n_refined: usize,
    /// Visible frames whose window was degenerate.
    pub n_refine_failed: usize,
    /// Gap frames filled by interpolation.
    pub n_interpolated: usize,
    /// Frames labeled unrecoverable.
    pub n_unrecoverable: usize,
    /// Border frames filled by replication.
    pub n_border_filled: usize,
    /// Positions removed because they were off the vocal folds.
    pub n_masked_vocalfold: usize,
    /// Positions removed because they were inside the glottis.
    pub n_masked_glottis: usize,
    /// Markers with no resolved position in any frame.
    pub n_lost_markers: usize,
}

/// Repaired trajectories plus the labels that produced them.
#[derive(Debug, Clone, Default)]
pub struct RepairResult {
    /// Repaired positions, same markers and frame count as the input.
    pub tracks: TrackTable,
    /// Run labels, marker-major `[marker][frame]`.
    pub labels: Vec<Vec<RunLabel>>,
    pub stats: RepairStats,
}
