//! Per-frame rejection of positions against binary segmentation masks.

use crate::{FrameStack, Sample};

/// Membership rule applied to the mask value under a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPredicate {
    /// Keep positions whose mask pixel is non-zero (e.g. on the vocal folds).
    Inside,
    /// Keep positions whose mask pixel is zero (e.g. not in the glottis).
    Outside,
}

impl MaskPredicate {
    #[inline]
    pub fn accepts(self, mask_value: u8) -> bool {
        match self {
            Self::Inside => mask_value > 0,
            Self::Outside => mask_value == 0,
        }
    }
}

/// Mask-filter switches.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaskFilterConfig {
    /// Apply the vocal-fold and glottis masks when they are supplied.
    pub enable: bool,
}

impl Default for MaskFilterConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

/// Mask value at the pixel containing `p` (floor), 0 outside the mask.
fn mask_value(mask: &image::GrayImage, p: [f64; 2]) -> u8 {
    let x = p[0].floor();
    let y = p[1].floor();
    if x < 0.0 || y < 0.0 || x >= mask.width() as f64 || y >= mask.height() as f64 {
        return 0;
    }
    mask.get_pixel(x as u32, y as u32)[0]
}

/// Null every position whose mask value fails `predicate`.
///
/// `samples` is marker-major (`[marker][frame]`); frame `t` is tested against
/// `masks[t]`. Unresolved samples pass through, as do frames beyond the end of
/// the mask stack. Positions are only ever removed, never added, so applying
/// the same filter twice is the same as applying it once.
pub fn filter_by_mask(
    samples: &[Vec<Sample>],
    masks: &FrameStack,
    predicate: MaskPredicate,
) -> Vec<Vec<Sample>> {
    samples
        .iter()
        .map(|track| {
            track
                .iter()
                .enumerate()
                .map(|(t, s)| match (s, masks.frame(t)) {
                    (Some(p), Some(mask)) if !predicate.accepts(mask_value(mask, *p)) => None,
                    _ => *s,
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// 10x10 masks whose left half (x < 5) is set.
    fn left_half_masks(n: usize) -> FrameStack {
        let mask = GrayImage::from_fn(10, 10, |x, _| Luma([if x < 5 { 255 } else { 0 }]));
        FrameStack::new(vec![mask; n]).expect("uniform masks")
    }

    #[test]
    fn inside_keeps_points_on_the_region() {
        let masks = left_half_masks(2);
        let tracks = vec![
            vec![Some([4.9, 3.0]), Some([5.0, 3.0])],
            vec![None, Some([-0.5, 2.0])],
        ];
        let out = filter_by_mask(&tracks, &masks, MaskPredicate::Inside);
        assert_eq!(out[0], vec![Some([4.9, 3.0]), None]);
        assert_eq!(out[1], vec![None, None]);
    }

    #[test]
    fn outside_keeps_points_off_the_region() {
        let masks = left_half_masks(1);
        let tracks = vec![vec![Some([1.0, 1.0])], vec![Some([7.5, 9.9])], vec![Some([42.0, 1.0])]];
        let out = filter_by_mask(&tracks, &masks, MaskPredicate::Outside);
        assert_eq!(out[0], vec![None]);
        assert_eq!(out[1], vec![Some([7.5, 9.9])]);
        assert_eq!(out[2], vec![Some([42.0, 1.0])]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let masks = left_half_masks(3);
        let tracks = vec![
            vec![Some([1.0, 1.0]), Some([6.0, 1.0]), None],
            vec![Some([8.0, 8.0]), Some([2.0, 2.0]), Some([4.0, 9.0])],
        ];
        for predicate in [MaskPredicate::Inside, MaskPredicate::Outside] {
            let once = filter_by_mask(&tracks, &masks, predicate);
            let twice = filter_by_mask(&once, &masks, predicate);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn frames_without_mask_pass_through() {
        let masks = left_half_masks(1);
        let tracks = vec![vec![Some([9.0, 9.0]), Some([9.0, 9.0])]];
        let out = filter_by_mask(&tracks, &masks, MaskPredicate::Inside);
        assert_eq!(out[0], vec![None, Some([9.0, 9.0])]);
    }
}
