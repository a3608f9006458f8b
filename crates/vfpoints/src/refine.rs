//! Sub-pixel refinement of visible detections (moment method).
//!
//! For every frame labeled [`RunLabel::Visible`] a window is cut around the
//! tracker's detection, the brightest interior pixel is located, and the
//! intensity-weighted centroid of a small sub-window around it gives the
//! refined position.

use crate::runs::RunLabel;
use crate::window::{extract_window, Crop, WindowConfig};
use crate::{FrameStack, Position, Sample};

/// Parameters of the moment-method centroid.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Half-size of the centroid sub-window (1 = 3x3).
    pub sub_window_radius: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            sub_window_radius: 1,
        }
    }
}

/// Refined positions of one trajectory plus bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct RefineOutcome {
    /// One sample per frame; only visible frames can be `Some`.
    pub positions: Vec<Sample>,
    /// Visible frames that produced a refined position.
    pub n_refined: usize,
    /// Visible frames whose window was degenerate (flat or missing detection).
    pub n_failed: usize,
}

/// Intensity-weighted centroid around the brightest interior pixel of `crop`.
///
/// The maximum search skips a border of `max(1, sub_window_radius)` pixels so
/// the sub-window always fits inside the crop. Returns `None` for a flat
/// patch (max == min) or a crop too small to host the sub-window. A flat
/// sub-window inside a non-flat patch resolves to its center.
pub fn moment_centroid(crop: &Crop, sub_window_radius: usize) -> Option<Position> {
    let size = crop.size();
    let margin = sub_window_radius.max(1);
    if size < 2 * margin + 1 {
        return None;
    }

    let (lo, hi) = crop.min_max();
    if !(hi > lo) {
        return None;
    }
    let range = hi - lo;
    let normalized = crop.pixels.map(|v| (v - lo) / range);

    let mut peak = (margin, margin);
    let mut peak_val = f32::NEG_INFINITY;
    for row in margin..size - margin {
        for col in margin..size - margin {
            let v = normalized[(row, col)];
            if v > peak_val {
                peak_val = v;
                peak = (row, col);
            }
        }
    }

    let r = sub_window_radius;
    let side = 2 * r + 1;
    let sub = normalized.view((peak.0 - r, peak.1 - r), (side, side));
    let (sub_lo, sub_hi) = (sub.min(), sub.max());

    let (c_row, c_col) = if sub_hi > sub_lo {
        let sub_range = sub_hi - sub_lo;
        let mut total = 0.0f64;
        let mut sum_row = 0.0f64;
        let mut sum_col = 0.0f64;
        for row in 0..side {
            for col in 0..side {
                let w = ((sub[(row, col)] - sub_lo) / sub_range) as f64;
                total += w;
                sum_row += row as f64 * w;
                sum_col += col as f64 * w;
            }
        }
        (sum_row / total, sum_col / total)
    } else {
        (r as f64, r as f64)
    };

    Some(crop.to_image(
        peak.0 as f64 + c_row - r as f64,
        peak.1 as f64 + c_col - r as f64,
    ))
}

/// Refine every visible frame of one trajectory.
///
/// Frames with any other label stay `None`; they are filled by later stages.
pub fn refine_trajectory(
    detections: &[Sample],
    labels: &[RunLabel],
    video: &FrameStack,
    window: &WindowConfig,
    config: &RefineConfig,
) -> RefineOutcome {
    let mut out = RefineOutcome {
        positions: vec![None; labels.len()],
        ..Default::default()
    };

    for (t, label) in labels.iter().enumerate() {
        if *label != RunLabel::Visible {
            continue;
        }
        let refined = match (detections.get(t).copied().flatten(), video.frame(t)) {
            (Some(p), Some(frame)) => {
                let crop = extract_window(frame, p, window.radius);
                moment_centroid(&crop, config.sub_window_radius)
            }
            _ => None,
        };
        match refined {
            Some(p) => {
                out.positions[t] = Some(p);
                out.n_refined += 1;
            }
            None => {
                tracing::trace!("frame {}: visible detection could not be refined", t);
                out.n_failed += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{blurred_disk, draw_spot};
    use approx::assert_abs_diff_eq;
    use image::GrayImage;
    use nalgebra::DMatrix;

    fn crop_from_rows(rows: &[&[f32]], origin: [f64; 2]) -> Crop {
        let n = rows.len();
        Crop {
            pixels: DMatrix::from_fn(n, n, |r, c| rows[r][c]),
            origin,
        }
    }

    #[test]
    fn symmetric_peak_refines_to_its_pixel() {
        let crop = crop_from_rows(
            &[
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 1.0, 2.0, 1.0, 0.0],
                &[0.0, 2.0, 9.0, 2.0, 0.0],
                &[0.0, 1.0, 2.0, 1.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 0.0],
            ],
            [40.0, 30.0],
        );
        let p = moment_centroid(&crop, 1).expect("refined");
        assert_abs_diff_eq!(p[0], 42.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], 32.0, epsilon = 1e-9);
    }

    #[test]
    fn two_pixel_plateau_lands_between_pixels() {
        let crop = crop_from_rows(
            &[
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 0.0, 5.0, 5.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 0.0],
            ],
            [0.0, 0.0],
        );
        let p = moment_centroid(&crop, 1).expect("refined");
        assert_abs_diff_eq!(p[0], 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn border_maximum_is_ignored() {
        let crop = crop_from_rows(
            &[
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 0.0, 0.0, 4.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0, 200.0],
            ],
            [0.0, 0.0],
        );
        let p = moment_centroid(&crop, 1).expect("refined");
        assert_abs_diff_eq!(p[0], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_patch_is_not_refined() {
        let crop = Crop {
            pixels: DMatrix::from_element(7, 7, 17.0),
            origin: [3.0, 3.0],
        };
        assert!(moment_centroid(&crop, 1).is_none());
    }

    #[test]
    fn flat_sub_window_resolves_to_peak_pixel() {
        let mut pixels = DMatrix::from_element(5, 5, 1.0f32);
        pixels[(4, 4)] = 0.0;
        let crop = Crop {
            pixels,
            origin: [10.0, 20.0],
        };
        let p = moment_centroid(&crop, 1).expect("refined");
        assert_eq!(p, [11.0, 21.0]);
    }

    #[test]
    fn gaussian_spot_refines_toward_true_center() {
        let frame = draw_spot(32, 32, [14.3, 12.0], 1.6, 200.0, 20.0);
        let crop = extract_window(&frame, [14.0, 12.0], 3);
        let p = moment_centroid(&crop, 1).expect("refined");
        assert!(p[0] > 14.0 && p[0] < 14.6, "x = {}", p[0]);
        assert_abs_diff_eq!(p[1], 12.0, epsilon = 1e-9);
    }

    #[test]
    fn blurred_reflection_refines_to_disk_center() {
        let frame = blurred_disk(24, 24, (11, 9), 2, 1.0);
        let crop = extract_window(&frame, [11.4, 9.3], 3);
        let p = moment_centroid(&crop, 1).expect("refined");
        assert_abs_diff_eq!(p[0], 11.0, epsilon = 0.05);
        assert_abs_diff_eq!(p[1], 9.0, epsilon = 0.05);
    }

    #[test]
    fn only_visible_frames_are_refined() {
        let spot = draw_spot(24, 24, [10.0, 11.0], 1.2, 220.0, 10.0);
        let video = FrameStack::new(vec![spot.clone(), spot.clone(), GrayImage::new(24, 24)])
            .expect("uniform frames");
        let detections = vec![Some([10.4, 10.6]), Some([10.0, 11.0]), Some([10.0, 11.0])];
        let labels = vec![
            RunLabel::Visible,
            RunLabel::Interpolate,
            RunLabel::Visible,
        ];
        let out = refine_trajectory(
            &detections,
            &labels,
            &video,
            &WindowConfig::default(),
            &RefineConfig::default(),
        );
        assert_eq!(out.n_refined, 1);
        assert_eq!(out.n_failed, 1);
        let p = out.positions[0].expect("visible frame refined");
        assert_abs_diff_eq!(p[0], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], 11.0, epsilon = 1e-9);
        assert!(out.positions[1].is_none());
        assert!(out.positions[2].is_none());
    }
}
