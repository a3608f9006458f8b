//! Grayscale frame sequences (video and segmentation masks).

use image::GrayImage;

use crate::RepairError;

/// A `[T][H][W]` stack of 8-bit grayscale frames of identical size.
///
/// Used for the video itself and for every binary mask sequence.
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    frames: Vec<GrayImage>,
}

impl FrameStack {
    /// Build a stack, rejecting frames whose size differs from the first one.
    pub fn new(frames: Vec<GrayImage>) -> Result<Self, RepairError> {
        if let Some(first) = frames.first() {
            let (w, h) = first.dimensions();
            for frame in &frames[1..] {
                let (fw, fh) = frame.dimensions();
                if fw != w {
                    return Err(RepairError::malformed(
                        "frame width",
                        w as usize,
                        fw as usize,
                    ));
                }
                if fh != h {
                    return Err(RepairError::malformed(
                        "frame height",
                        h as usize,
                        fh as usize,
                    ));
                }
            }
        }
        Ok(Self { frames })
    }

    /// Number of frames `T`.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame size `[width, height]`, or `[0, 0]` for an empty stack.
    pub fn dimensions(&self) -> [u32; 2] {
        self.frames
            .first()
            .map(|f| [f.width(), f.height()])
            .unwrap_or([0, 0])
    }

    pub fn frame(&self, index: usize) -> Option<&GrayImage> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[GrayImage] {
        &self.frames
    }

    /// Check that `other` has this stack's frame count and frame size.
    pub(crate) fn ensure_matches(
        &self,
        other: &FrameStack,
        what: &'static str,
    ) -> Result<(), RepairError> {
        if other.len() != self.len() {
            return Err(RepairError::malformed(what, self.len(), other.len()));
        }
        let [w, h] = self.dimensions();
        let [ow, oh] = other.dimensions();
        if ow != w {
            return Err(RepairError::malformed(what, w as usize, ow as usize));
        }
        if oh != h {
            return Err(RepairError::malformed(what, h as usize, oh as usize));
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for FrameStack {
    type Output = GrayImage;

    fn index(&self, index: usize) -> &GrayImage {
        &self.frames[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mixed_frame_sizes() {
        let frames = vec![GrayImage::new(8, 6), GrayImage::new(8, 7)];
        let err = FrameStack::new(frames).expect_err("mixed sizes");
        assert!(matches!(
            err,
            RepairError::MalformedInput {
                what: "frame height",
                expected: 6,
                got: 7
            }
        ));
    }

    #[test]
    fn mask_stack_must_match_video() {
        let video = FrameStack::new(vec![GrayImage::new(8, 6); 3]).unwrap();
        let short = FrameStack::new(vec![GrayImage::new(8, 6); 2]).unwrap();
        let narrow = FrameStack::new(vec![GrayImage::new(4, 6); 3]).unwrap();
        assert!(video.ensure_matches(&short, "mask frames").is_err());
        assert!(video.ensure_matches(&narrow, "mask frames").is_err());
        assert!(video.ensure_matches(&video.clone(), "mask frames").is_ok());
    }

    #[test]
    fn empty_stack_has_zero_dimensions() {
        let stack = FrameStack::new(Vec::new()).unwrap();
        assert!(stack.is_empty());
        assert_eq!(stack.dimensions(), [0, 0]);
    }
}
