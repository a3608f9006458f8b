//! Linear interpolation across short, doubly-bounded gaps.

use crate::runs::RunLabel;
use crate::Sample;

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Fill every [`RunLabel::Interpolate`] frame from its nearest visible anchors.
///
/// Anchors are the refined positions of the closest preceding and following
/// visible frames. An interpolate frame whose anchor failed refinement stays
/// `None`. Other frames are copied through unchanged.
pub fn interpolate_gaps(refined: &[Sample], labels: &[RunLabel]) -> Vec<Sample> {
    let mut out = refined.to_vec();
    let n = labels.len().min(refined.len());

    let mut prev_visible: Option<usize> = None;
    let mut t = 0;
    while t < n {
        if labels[t] != RunLabel::Interpolate {
            if labels[t] == RunLabel::Visible {
                prev_visible = Some(t);
            }
            t += 1;
            continue;
        }

        let start = t;
        while t < n && labels[t] == RunLabel::Interpolate {
            t += 1;
        }
        let next_visible = (t < n && labels[t] == RunLabel::Visible).then_some(t);

        let (Some(t0), Some(t1)) = (prev_visible, next_visible) else {
            continue;
        };
        let (Some(a), Some(b)) = (refined[t0], refined[t1]) else {
            continue;
        };
        let span = (t1 - t0) as f64;
        for (i, slot) in out.iter_mut().enumerate().take(t).skip(start) {
            let alpha = (i - t0) as f64 / span;
            *slot = Some([lerp(a[0], b[0], alpha), lerp(a[1], b[1], alpha)]);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn labels(s: &str) -> Vec<RunLabel> {
        s.chars()
            .map(|c| match c {
                'V' => RunLabel::Visible,
                'I' => RunLabel::Interpolate,
                _ => RunLabel::Unrecoverable,
            })
            .collect()
    }

    #[test]
    fn midpoint_between_anchors_is_exact() {
        let mut refined = vec![None; 11];
        refined[0] = Some([0.0, 0.0]);
        refined[10] = Some([10.0, 20.0]);
        let out = interpolate_gaps(&refined, &labels("VIIIIIIIIIV"));
        assert_eq!(out[5], Some([5.0, 10.0]));
        let p = out[3].expect("filled");
        assert_abs_diff_eq!(p[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], 6.0, epsilon = 1e-12);
        assert_eq!(out[0], refined[0]);
        assert_eq!(out[10], refined[10]);
    }

    #[test]
    fn each_gap_uses_its_own_anchors() {
        let refined = vec![
            Some([0.0, 0.0]),
            None,
            Some([2.0, 2.0]),
            None,
            None,
            Some([5.0, -1.0]),
        ];
        let out = interpolate_gaps(&refined, &labels("VIVIIV"));
        assert_eq!(out[1], Some([1.0, 1.0]));
        for (t, expected) in [(3, [3.0, 1.0]), (4, [4.0, 0.0])] {
            let p = out[t].expect("filled");
            assert_abs_diff_eq!(p[0], expected[0], epsilon = 1e-12);
            assert_abs_diff_eq!(p[1], expected[1], epsilon = 1e-12);
        }
    }

    #[test]
    fn unrecoverable_frames_stay_empty() {
        let refined = vec![Some([1.0, 1.0]), None, None, Some([4.0, 4.0]), None];
        let out = interpolate_gaps(&refined, &labels("VEEVE"));
        assert_eq!(out, refined);
    }

    #[test]
    fn failed_anchor_leaves_gap_empty() {
        let refined = vec![Some([1.0, 1.0]), None, None, None];
        let out = interpolate_gaps(&refined, &labels("VIIV"));
        assert!(out[1].is_none() && out[2].is_none());
    }

    #[test]
    fn all_empty_trajectory_is_unchanged() {
        let refined = vec![None; 6];
        let out = interpolate_gaps(&refined, &labels("EEEEEE"));
        assert_eq!(out, refined);
    }
}
