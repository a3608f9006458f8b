//! Stages that run on one marker's full time axis.

use crate::border::{border_len, fill_border};
use crate::interpolate::interpolate_gaps;
use crate::refine::refine_trajectory;
use crate::runs::{encode_runs, RunCounts, RunLabel, VisibilityClass};
use crate::smooth::smooth_trajectory;
use crate::{FrameStack, RepairConfig, Sample};

/// Output of the per-marker stages.
#[derive(Debug, Clone, Default)]
pub(super) struct MarkerRepair {
    pub labels: Vec<RunLabel>,
    pub samples: Vec<Sample>,
    pub counts: RunCounts,
    pub n_refined: usize,
    pub n_refine_failed: usize,
    pub n_interpolated: usize,
    pub n_border_filled: usize,
}

fn n_resolved(samples: &[Sample]) -> usize {
    samples.iter().filter(|s| s.is_some()).count()
}

pub(super) fn repair_marker(
    detections: &[Sample],
    classes: &[VisibilityClass],
    video: &FrameStack,
    config: &RepairConfig,
) -> MarkerRepair {
    let labels = encode_runs(classes, config.runs.max_gap);
    let counts = RunCounts::from_labels(&labels);

    let refined = refine_trajectory(detections, &labels, video, &config.window, &config.refine);

    let filled = interpolate_gaps(&refined.positions, &labels);
    let n_interpolated = n_resolved(&filled) - refined.n_refined;

    let (bordered, n_border_filled) = if config.border_fill {
        let n = border_len(&filled);
        (fill_border(&filled), n)
    } else {
        (filled, 0)
    };

    let samples = if config.smoothing.enable {
        smooth_trajectory(&bordered, &config.smoothing)
    } else {
        bordered
    };

    MarkerRepair {
        labels,
        samples,
        counts,
        n_refined: refined.n_refined,
        n_refine_failed: refined.n_failed,
        n_interpolated,
        n_border_filled,
    }
}
