use crate::runs::VisibilityClass;
use crate::{FrameStack, RepairError, TrackTable};

/// Everything one repair run reads, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct RepairInput<'a> {
    /// Tracker detections, one track per marker.
    pub detections: &'a TrackTable,
    /// Classifier output, frame-major `[frame][marker]`.
    pub classes: &'a [Vec<VisibilityClass>],
    /// Grayscale video the detections were made on.
    pub video: &'a FrameStack,
    /// Vocal-fold segmentation; positions must lie on it.
    pub vocalfold_masks: Option<&'a FrameStack>,
    /// Glottis segmentation; positions must not lie on it.
    pub glottis_masks: Option<&'a FrameStack>,
}

impl<'a> RepairInput<'a> {
    pub fn new(
        detections: &'a TrackTable,
        classes: &'a [Vec<VisibilityClass>],
        video: &'a FrameStack,
    ) -> Self {
        Self {
            detections,
            classes,
            video,
            vocalfold_masks: None,
            glottis_masks: None,
        }
    }

    pub fn with_vocalfold_masks(mut self, masks: &'a FrameStack) -> Self {
        self.vocalfold_masks = Some(masks);
        self
    }

    pub fn with_glottis_masks(mut self, masks: &'a FrameStack) -> Self {
        self.glottis_masks = Some(masks);
        self
    }

    /// Fail fast on any frame-count, marker-count or image-size mismatch.
    pub(crate) fn validate(&self) -> Result<(), RepairError> {
        let n_frames = self.detections.n_frames();
        let n_markers = self.detections.n_markers();

        if self.classes.len() != n_frames {
            return Err(RepairError::malformed(
                "class frames",
                n_frames,
                self.classes.len(),
            ));
        }
        if let Some(row) = self.classes.iter().find(|row| row.len() != n_markers) {
            return Err(RepairError::malformed(
                "classes per frame",
                n_markers,
                row.len(),
            ));
        }
        if self.video.len() != n_frames {
            return Err(RepairError::malformed(
                "video frames",
                n_frames,
                self.video.len(),
            ));
        }
        if let Some(masks) = self.vocalfold_masks {
            self.video.ensure_matches(masks, "vocal-fold masks")?;
        }
        if let Some(masks) = self.glottis_masks {
            self.video.ensure_matches(masks, "glottis masks")?;
        }
        Ok(())
    }
}
