//! Visibility classification seam.
//!
//! The classifier is an external model; the pipeline only ever sees its
//! answers. A [`VisibilityOracle`] is handed in explicitly, so the repair code
//! never loads or owns a model.

use rayon::prelude::*;

use crate::runs::VisibilityClass;
use crate::window::{extract_window, Crop, WindowConfig};
use crate::{FrameStack, RepairError, TrackTable};

/// Source of per-(frame, marker) visibility labels.
pub trait VisibilityOracle: Sync {
    /// Classify the detection of `marker` in `frame`, given its crop.
    fn classify(&self, frame: usize, marker: usize, crop: &Crop) -> VisibilityClass;
}

impl<F> VisibilityOracle for F
where
    F: Fn(usize, usize, &Crop) -> VisibilityClass + Sync,
{
    fn classify(&self, frame: usize, marker: usize, crop: &Crop) -> VisibilityClass {
        self(frame, marker, crop)
    }
}

/// Labels computed ahead of time, frame-major `[frame][marker]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputedClasses {
    classes: Vec<Vec<VisibilityClass>>,
}

impl PrecomputedClasses {
    pub fn new(classes: Vec<Vec<VisibilityClass>>) -> Self {
        Self { classes }
    }

    pub fn frame_major(&self) -> &[Vec<VisibilityClass>] {
        &self.classes
    }
}

impl VisibilityOracle for PrecomputedClasses {
    /// Entries outside the stored table read as unidentifiable.
    fn classify(&self, frame: usize, marker: usize, _crop: &Crop) -> VisibilityClass {
        self.classes
            .get(frame)
            .and_then(|row| row.get(marker))
            .copied()
            .unwrap_or(VisibilityClass::Unidentifiable)
    }
}

/// Query `oracle` for every (frame, marker) detection.
///
/// Returns the frame-major class table the pipeline consumes. A missing
/// detection has no crop to look at and is labeled unidentifiable.
pub fn classify_crops(
    oracle: &dyn VisibilityOracle,
    detections: &TrackTable,
    video: &FrameStack,
    window: &WindowConfig,
) -> Result<Vec<Vec<VisibilityClass>>, RepairError> {
    if video.len() != detections.n_frames() {
        return Err(RepairError::malformed(
            "video frames",
            detections.n_frames(),
            video.len(),
        ));
    }

    let classes = (0..detections.n_frames())
        .into_par_iter()
        .map(|t| {
            let frame = &video[t];
            (0..detections.n_markers())
                .map(|m| match detections.track(m)[t] {
                    Some(p) => oracle.classify(t, m, &extract_window(frame, p, window.radius)),
                    None => VisibilityClass::Unidentifiable,
                })
                .collect()
        })
        .collect();
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::draw_spot;
    use crate::MarkerId;
    use image::GrayImage;

    #[test]
    fn precomputed_lookup_defaults_to_unidentifiable() {
        let oracle = PrecomputedClasses::new(vec![vec![
            VisibilityClass::Visible,
            VisibilityClass::Specular,
        ]]);
        let crop = extract_window(&GrayImage::new(4, 4), [1.0, 1.0], 1);
        assert_eq!(oracle.classify(0, 1, &crop), VisibilityClass::Specular);
        assert_eq!(oracle.classify(0, 2, &crop), VisibilityClass::Unidentifiable);
        assert_eq!(oracle.classify(3, 0, &crop), VisibilityClass::Unidentifiable);
    }

    #[test]
    fn closure_oracle_sees_each_crop() {
        let bright = draw_spot(20, 20, [10.0, 10.0], 1.0, 250.0, 0.0);
        let video = FrameStack::new(vec![bright, GrayImage::new(20, 20)]).expect("frames");
        let detections = TrackTable::from_frame_major(
            vec![MarkerId::new(0, 0), MarkerId::new(1, 0)],
            &[
                vec![Some([10.0, 10.0]), None],
                vec![Some([10.0, 10.0]), Some([3.0, 3.0])],
            ],
        )
        .expect("tracks");

        let by_brightness = |_t: usize, _m: usize, crop: &Crop| {
            if crop.min_max().1 > 128.0 {
                VisibilityClass::Visible
            } else {
                VisibilityClass::Specular
            }
        };
        let classes =
            classify_crops(&by_brightness, &detections, &video, &WindowConfig::default())
                .expect("classified");
        assert_eq!(
            classes,
            vec![
                vec![VisibilityClass::Visible, VisibilityClass::Unidentifiable],
                vec![VisibilityClass::Specular, VisibilityClass::Specular],
            ]
        );
    }

    #[test]
    fn video_length_must_match_tracks() {
        let video = FrameStack::new(vec![GrayImage::new(4, 4)]).expect("frames");
        let detections =
            TrackTable::new(vec![MarkerId::new(0, 0)], vec![vec![None, None]]).expect("tracks");
        let oracle = PrecomputedClasses::default();
        assert!(classify_crops(&oracle, &detections, &video, &WindowConfig::default()).is_err());
    }
}
