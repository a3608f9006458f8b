//! vfpoints: temporal repair of laser-point trajectories in laryngoscopy video.
//!
//! A point tracker follows every projected laser marker through the video,
//! and a classifier tags each per-frame detection as visible, specular or
//! unidentifiable. This crate turns those noisy inputs into clean sub-pixel
//! trajectories. The repair stages are:
//!
//! 1. **Runs**: per-marker run-length labeling of the visibility classes into
//!    visible / interpolate / unrecoverable frames.
//! 2. **Refine**: sub-pixel position for visible frames via window extraction,
//!    interior local maximum, intensity-weighted centroid (moment method).
//! 3. **Interpolate**: linear fill of short gaps bounded by refined anchors.
//! 4. **Border**: replicate padding of leading/trailing unresolved frames.
//! 5. **Smooth**: 1-D Gaussian smoothing along time.
//! 6. **Mask**: per-frame rejection of points off the vocal folds or inside
//!    the glottis.
//!
//! # Public API
//! - [`Repairer`] and [`RepairConfig`] as primary entry points
//! - [`RepairInput`] / [`RepairResult`] for the data crossing the boundary
//! - the individual stage functions, each pure and testable in isolation
//! - [`project`] for the frame-indexed JSON files used by the labeling tool

mod api;
mod border;
mod config;
mod error;
mod frames;
mod interpolate;
mod mask;
mod oracle;
mod pipeline;
pub mod project;
mod refine;
mod runs;
mod smooth;
mod tracks;
mod window;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::{repair_tracks, Repairer};
pub use border::fill_border;
pub use config::RepairConfig;
pub use error::RepairError;
pub use frames::FrameStack;
pub use interpolate::interpolate_gaps;
pub use mask::{filter_by_mask, MaskFilterConfig, MaskPredicate};
pub use oracle::{classify_crops, PrecomputedClasses, VisibilityOracle};
pub use pipeline::{RepairInput, RepairResult, RepairStats};
pub use refine::{moment_centroid, refine_trajectory, RefineConfig, RefineOutcome};
pub use runs::{encode_runs, RunConfig, RunCounts, RunLabel, VisibilityClass};
pub use smooth::{gaussian_kernel, smooth_trajectory, SmoothConfig};
pub use tracks::{MarkerId, TrackTable};
pub use window::{extract_window, Crop, WindowConfig};

/// Sub-pixel image position `[x, y]` (x = column, y = row).
pub type Position = [f64; 2];

/// One frame of a trajectory. `None` means "no usable position".
pub type Sample = Option<Position>;

/// Normalize a raw coordinate pair into a [`Sample`].
///
/// Any non-finite coordinate makes the whole sample unresolved.
#[inline]
pub fn sample_from_xy(x: f64, y: f64) -> Sample {
    if x.is_finite() && y.is_finite() {
        Some([x, y])
    } else {
        None
    }
}
