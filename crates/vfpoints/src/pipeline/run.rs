//! Top-level pipeline orchestrator: per-marker stages -> mask passes -> stats.

use rayon::prelude::*;

use super::input::RepairInput;
use super::marker::{repair_marker, MarkerRepair};
use super::result::{RepairResult, RepairStats};
use crate::mask::{filter_by_mask, MaskPredicate};
use crate::runs::VisibilityClass;
use crate::tracks::count_resolved;
use crate::{FrameStack, RepairConfig, RepairError, Sample, TrackTable};

/// Apply one mask pass, returning the number of positions it removed.
fn mask_pass(
    samples: &mut Vec<Vec<Sample>>,
    masks: Option<&FrameStack>,
    predicate: MaskPredicate,
) -> usize {
    let Some(masks) = masks else {
        return 0;
    };
    let before = count_resolved(samples);
    *samples = filter_by_mask(samples, masks, predicate);
    before - count_resolved(samples)
}

pub(crate) fn run(
    input: &RepairInput<'_>,
    config: &RepairConfig,
) -> Result<RepairResult, RepairError> {
    config.validate()?;
    input.validate()?;

    let detections = input.detections;
    let n_markers = detections.n_markers();
    let n_frames = detections.n_frames();

    let repaired: Vec<MarkerRepair> = (0..n_markers)
        .into_par_iter()
        .map(|m| {
            let classes: Vec<VisibilityClass> = input.classes.iter().map(|row| row[m]).collect();
            repair_marker(detections.track(m), &classes, input.video, config)
        })
        .collect();

    let mut stats = RepairStats {
        n_markers,
        n_frames,
        ..RepairStats::default()
    };
    let mut labels = Vec::with_capacity(n_markers);
    let mut samples = Vec::with_capacity(n_markers);
    for (m, r) in repaired.into_iter().enumerate() {
        tracing::debug!(
            marker = %detections.markers()[m],
            visible = r.counts.visible,
            interpolate = r.counts.interpolate,
            unrecoverable = r.counts.unrecoverable,
            refine_failed = r.n_refine_failed,
            "marker repaired"
        );
        stats.n_visible += r.counts.visible;
        stats.n_unrecoverable += r.counts.unrecoverable;
        stats.n_refined += r.n_refined;
        stats.n_refine_failed += r.n_refine_failed;
        stats.n_interpolated += r.n_interpolated;
        stats.n_border_filled += r.n_border_filled;
        labels.push(r.labels);
        samples.push(r.samples);
    }

    if config.mask_filter.enable {
        stats.n_masked_vocalfold =
            mask_pass(&mut samples, input.vocalfold_masks, MaskPredicate::Inside);
        stats.n_masked_glottis =
            mask_pass(&mut samples, input.glottis_masks, MaskPredicate::Outside);
    }

    let tracks = TrackTable::with_frames(detections.markers().to_vec(), samples, n_frames)?;

    let lost = tracks.lost_markers();
    stats.n_lost_markers = lost.len();
    if !lost.is_empty() {
        tracing::warn!(
            n_lost = lost.len(),
            "markers without any resolved position: {}",
            lost.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    tracing::info!(
        n_markers,
        n_frames,
        n_lost_markers = stats.n_lost_markers,
        n_refined = stats.n_refined,
        n_interpolated = stats.n_interpolated,
        n_border_filled = stats.n_border_filled,
        n_masked_vocalfold = stats.n_masked_vocalfold,
        n_masked_glottis = stats.n_masked_glottis,
        "repair complete"
    );

    Ok(RepairResult {
        tracks,
        labels,
        stats,
    })
}
