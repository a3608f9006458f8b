//! Frame-indexed JSON documents shared with the labeling tool.
//!
//! Both points and labels files are a JSON object keyed `"Frame0"`,
//! `"Frame1"`, ... whose values list one entry per marker, in the same
//! marker order for every frame:
//!
//! ```json
//! { "Frame0": [ { "x_id": 0, "y_id": 3, "x_pos": 101.5, "y_pos": 88.25 } ] }
//! { "Frame0": [ { "x_id": 0, "y_id": 3, "label": 2 } ] }
//! ```
//!
//! Unresolved positions are written as `null`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::runs::{RunLabel, VisibilityClass};
use crate::{sample_from_xy, MarkerId, RepairError, Sample, TrackTable};

const FRAME_PREFIX: &str = "Frame";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PointEntry {
    x_id: u32,
    y_id: u32,
    #[serde(default)]
    x_pos: Option<f64>,
    #[serde(default)]
    y_pos: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LabelEntry {
    x_id: u32,
    y_id: u32,
    label: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    run: Option<RunLabel>,
}

trait Keyed {
    fn marker(&self) -> MarkerId;
}

impl Keyed for PointEntry {
    fn marker(&self) -> MarkerId {
        MarkerId::new(self.x_id, self.y_id)
    }
}

impl Keyed for LabelEntry {
    fn marker(&self) -> MarkerId {
        MarkerId::new(self.x_id, self.y_id)
    }
}

fn frame_key(t: usize) -> String {
    format!("{FRAME_PREFIX}{t}")
}

/// Frame index of a canonical `Frame{i}` key. `Frame01` and similar are not.
fn frame_index(key: &str) -> Option<usize> {
    let t: usize = key.strip_prefix(FRAME_PREFIX)?.parse().ok()?;
    (frame_key(t) == key).then_some(t)
}

/// One past the highest `Frame{i}` index in the document.
fn count_frames(doc: &Map<String, Value>) -> usize {
    doc.keys()
        .filter_map(|k| frame_index(k))
        .max()
        .map_or(0, |t| t + 1)
}

fn frame_entries<E: DeserializeOwned>(
    doc: &Map<String, Value>,
    n_frames: usize,
) -> Result<Vec<Vec<E>>, RepairError> {
    (0..n_frames)
        .map(|t| {
            let value = doc.get(&frame_key(t)).ok_or(RepairError::MissingFrame(t))?;
            Ok(Vec::<E>::deserialize(value)?)
        })
        .collect()
}

/// Marker order of frame 0, checked against every other frame.
fn marker_order<E: Keyed>(frames: &[Vec<E>]) -> Result<Vec<MarkerId>, RepairError> {
    let Some(first) = frames.first() else {
        return Ok(Vec::new());
    };
    let markers: Vec<MarkerId> = first.iter().map(Keyed::marker).collect();
    for (t, frame) in frames.iter().enumerate().skip(1) {
        if frame.len() != markers.len() {
            return Err(RepairError::malformed(
                "markers per frame",
                markers.len(),
                frame.len(),
            ));
        }
        let matching = frame
            .iter()
            .zip(&markers)
            .filter(|(e, id)| e.marker() == **id)
            .count();
        if matching != markers.len() {
            tracing::debug!(frame = t, "marker ids differ from frame 0");
            return Err(RepairError::malformed(
                "marker ids matching frame 0",
                markers.len(),
                matching,
            ));
        }
    }
    Ok(markers)
}

/// Require the marker ids of a document to equal `expected`, in order.
fn check_markers(found: &[MarkerId], expected: &[MarkerId]) -> Result<(), RepairError> {
    if found.len() != expected.len() {
        return Err(RepairError::malformed(
            "markers per frame",
            expected.len(),
            found.len(),
        ));
    }
    let matching = found.iter().zip(expected).filter(|(a, b)| a == b).count();
    if matching != expected.len() {
        return Err(RepairError::malformed(
            "marker ids matching points",
            expected.len(),
            matching,
        ));
    }
    Ok(())
}

fn write_json(path: &Path, value: &Value) -> Result<(), RepairError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

// ── Points ─────────────────────────────────────────────────────────────────

/// Parse a points document. The frame count is one past the highest
/// `Frame{i}` index; every lower index must be present.
pub fn points_from_json_str(raw: &str) -> Result<TrackTable, RepairError> {
    let doc: Map<String, Value> = serde_json::from_str(raw)?;
    let n_frames = count_frames(&doc);
    let frames = frame_entries::<PointEntry>(&doc, n_frames)?;
    let markers = marker_order(&frames)?;
    let rows: Vec<Vec<Sample>> = frames
        .iter()
        .map(|frame| {
            frame
                .iter()
                .map(|e| match (e.x_pos, e.y_pos) {
                    (Some(x), Some(y)) => sample_from_xy(x, y),
                    _ => None,
                })
                .collect()
        })
        .collect();
    TrackTable::from_frame_major(markers, &rows)
}

pub fn read_points_json(path: &Path) -> Result<TrackTable, RepairError> {
    let data = std::fs::read_to_string(path)?;
    points_from_json_str(&data)
}

/// Encode a track table as a points document.
pub fn points_to_json_value(tracks: &TrackTable) -> Result<Value, RepairError> {
    let mut doc = Map::new();
    for (t, row) in tracks.to_frame_major().iter().enumerate() {
        let entries: Vec<PointEntry> = tracks
            .markers()
            .iter()
            .zip(row)
            .map(|(id, s)| PointEntry {
                x_id: id.x_id,
                y_id: id.y_id,
                x_pos: s.map(|p| p[0]),
                y_pos: s.map(|p| p[1]),
            })
            .collect();
        doc.insert(frame_key(t), serde_json::to_value(entries)?);
    }
    Ok(Value::Object(doc))
}

pub fn write_points_json(path: &Path, tracks: &TrackTable) -> Result<(), RepairError> {
    write_json(path, &points_to_json_value(tracks)?)
}

// ── Labels ─────────────────────────────────────────────────────────────────

/// Parse the first `n_frames` frames of a labels document into the
/// frame-major class array `[frame][marker]`.
///
/// Every frame must list exactly `markers`, in that order, so that classes
/// line up with the tracks of the matching points document.
pub fn labels_from_json_str(
    raw: &str,
    markers: &[MarkerId],
    n_frames: usize,
) -> Result<Vec<Vec<VisibilityClass>>, RepairError> {
    let doc: Map<String, Value> = serde_json::from_str(raw)?;
    let frames = frame_entries::<LabelEntry>(&doc, n_frames)?;
    if !frames.is_empty() {
        check_markers(&marker_order(&frames)?, markers)?;
    }
    frames
        .iter()
        .map(|frame| {
            frame
                .iter()
                .map(|e| {
                    VisibilityClass::from_code(e.label).ok_or_else(|| {
                        RepairError::malformed(
                            "label code at most",
                            VisibilityClass::Visible.code() as usize,
                            e.label as usize,
                        )
                    })
                })
                .collect()
        })
        .collect()
}

pub fn read_labels_json(
    path: &Path,
    markers: &[MarkerId],
    n_frames: usize,
) -> Result<Vec<Vec<VisibilityClass>>, RepairError> {
    let data = std::fs::read_to_string(path)?;
    labels_from_json_str(&data, markers, n_frames)
}

/// Encode repaired run labels as a labels document.
///
/// `labels` is marker-major, as returned in
/// [`RepairResult::labels`](crate::RepairResult). Each entry carries the run
/// label as `run`; `label` is the visible code when the repaired sample is
/// resolved and the unidentifiable code otherwise.
pub fn run_labels_to_json_value(
    tracks: &TrackTable,
    labels: &[Vec<RunLabel>],
) -> Result<Value, RepairError> {
    if labels.len() != tracks.n_markers() {
        return Err(RepairError::malformed(
            "run label tracks",
            tracks.n_markers(),
            labels.len(),
        ));
    }
    if let Some(bad) = labels.iter().find(|l| l.len() != tracks.n_frames()) {
        return Err(RepairError::malformed(
            "run label length",
            tracks.n_frames(),
            bad.len(),
        ));
    }

    let mut doc = Map::new();
    for t in 0..tracks.n_frames() {
        let entries: Vec<LabelEntry> = tracks
            .markers()
            .iter()
            .enumerate()
            .map(|(m, id)| {
                let class = if tracks.track(m)[t].is_some() {
                    VisibilityClass::Visible
                } else {
                    VisibilityClass::Unidentifiable
                };
                LabelEntry {
                    x_id: id.x_id,
                    y_id: id.y_id,
                    label: class.code(),
                    run: Some(labels[m][t]),
                }
            })
            .collect();
        doc.insert(frame_key(t), serde_json::to_value(entries)?);
    }
    Ok(Value::Object(doc))
}

pub fn write_run_labels_json(
    path: &Path,
    tracks: &TrackTable,
    labels: &[Vec<RunLabel>],
) -> Result<(), RepairError> {
    write_json(path, &run_labels_to_json_value(tracks, labels)?)
}
