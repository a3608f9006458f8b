//! Marker identities and the marker-major trajectory table.

use serde::{Deserialize, Serialize};

use crate::{RepairError, Sample};

/// Fixed grid index of a laser marker, assigned when it was first localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId {
    pub x_id: u32,
    pub y_id: u32,
}

impl MarkerId {
    pub fn new(x_id: u32, y_id: u32) -> Self {
        Self { x_id, y_id }
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x_id, self.y_id)
    }
}

/// Trajectories of every marker over `T` frames, indexed `[marker][frame]`.
///
/// Every track has the same length; construction rejects ragged input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTable {
    markers: Vec<MarkerId>,
    samples: Vec<Vec<Sample>>,
    n_frames: usize,
}

impl TrackTable {
    /// Build from marker-major tracks. `T` is taken from the first track.
    pub fn new(markers: Vec<MarkerId>, samples: Vec<Vec<Sample>>) -> Result<Self, RepairError> {
        let n_frames = samples.first().map_or(0, Vec::len);
        Self::with_frames(markers, samples, n_frames)
    }

    /// Build from marker-major tracks with an explicit frame count.
    pub fn with_frames(
        markers: Vec<MarkerId>,
        samples: Vec<Vec<Sample>>,
        n_frames: usize,
    ) -> Result<Self, RepairError> {
        if samples.len() != markers.len() {
            return Err(RepairError::malformed(
                "tracks per marker id",
                markers.len(),
                samples.len(),
            ));
        }
        if let Some(bad) = samples.iter().find(|s| s.len() != n_frames) {
            return Err(RepairError::malformed("track length", n_frames, bad.len()));
        }
        Ok(Self {
            markers,
            samples,
            n_frames,
        })
    }

    /// Build from the tracker's frame-major layout `[frame][marker]`.
    pub fn from_frame_major(
        markers: Vec<MarkerId>,
        frames: &[Vec<Sample>],
    ) -> Result<Self, RepairError> {
        let n_markers = markers.len();
        if let Some(bad) = frames.iter().find(|row| row.len() != n_markers) {
            return Err(RepairError::malformed(
                "markers per frame",
                n_markers,
                bad.len(),
            ));
        }
        let samples = (0..n_markers)
            .map(|m| frames.iter().map(|row| row[m]).collect())
            .collect();
        Self::with_frames(markers, samples, frames.len())
    }

    /// Frame-major copy `[frame][marker]`, the layout consumers serialize.
    pub fn to_frame_major(&self) -> Vec<Vec<Sample>> {
        (0..self.n_frames)
            .map(|t| self.samples.iter().map(|track| track[t]).collect())
            .collect()
    }

    pub fn n_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn markers(&self) -> &[MarkerId] {
        &self.markers
    }

    /// Marker-major tracks.
    pub fn samples(&self) -> &[Vec<Sample>] {
        &self.samples
    }

    pub fn track(&self, marker: usize) -> &[Sample] {
        &self.samples[marker]
    }

    pub fn into_parts(self) -> (Vec<MarkerId>, Vec<Vec<Sample>>) {
        (self.markers, self.samples)
    }

    /// Total number of resolved samples over all tracks.
    pub fn n_resolved(&self) -> usize {
        count_resolved(&self.samples)
    }

    /// Markers whose whole track is unresolved.
    pub fn lost_markers(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .zip(&self.samples)
            .filter(|(_, track)| track.iter().all(Option::is_none))
            .map(|(id, _)| *id)
            .collect()
    }
}

pub(crate) fn count_resolved(samples: &[Vec<Sample>]) -> usize {
    samples
        .iter()
        .map(|track| track.iter().filter(|s| s.is_some()).count())
        .sum()
}
