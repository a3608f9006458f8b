//! Fixed-size intensity windows around (sub-pixel) points.

use image::GrayImage;
use nalgebra::DMatrix;

use crate::Position;

/// Configuration of the square crop extracted around each point.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Half-size of the window; the crop is `(2 * radius + 1)` pixels wide.
    pub radius: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { radius: 3 }
    }
}

impl WindowConfig {
    /// Side length of the (odd, square) crop.
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }
}

/// Intensity patch cut out of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    /// Raw intensities, `rows x cols` (row = y, col = x).
    pub pixels: DMatrix<f32>,
    /// Image coordinates `[x, y]` of the top-left pixel of the patch.
    pub origin: [f64; 2],
}

impl Crop {
    /// Side length of the crop.
    pub fn size(&self) -> usize {
        self.pixels.nrows()
    }

    /// `(min, max)` intensity over the whole patch.
    pub fn min_max(&self) -> (f32, f32) {
        (self.pixels.min(), self.pixels.max())
    }

    /// Map a local `(row, col)` coordinate back into image `[x, y]`.
    pub fn to_image(&self, row: f64, col: f64) -> Position {
        [self.origin[0] + col, self.origin[1] + row]
    }
}

/// Top-left corner of a `size`-wide window centered on `center`, kept inside
/// `[0, extent)` whenever the image is at least `size` pixels wide.
fn clamp_origin(center: f64, radius: usize, extent: u32) -> i64 {
    let c = if center.is_finite() {
        center.round() as i64
    } else {
        0
    };
    let size = (2 * radius + 1) as i64;
    let max_origin = (extent as i64 - size).max(0);
    (c - radius as i64).clamp(0, max_origin)
}

fn inside(center: f64, extent: u32) -> bool {
    if !center.is_finite() {
        return false;
    }
    let c = center.floor();
    c >= 0.0 && c < extent as f64
}

/// Extract a `(2 * radius + 1)`-square crop around `point`.
///
/// The window is shifted to stay within the image bounds. A point that lies
/// outside the image (or is non-finite) yields an all-zero crop whose origin
/// is clamped to the nearest valid position. Never fails.
pub fn extract_window(frame: &GrayImage, point: Position, radius: usize) -> Crop {
    let (w, h) = frame.dimensions();
    let size = 2 * radius + 1;
    let ox = clamp_origin(point[0], radius, w);
    let oy = clamp_origin(point[1], radius, h);
    let origin = [ox as f64, oy as f64];

    if !inside(point[0], w) || !inside(point[1], h) {
        return Crop {
            pixels: DMatrix::zeros(size, size),
            origin,
        };
    }

    let pixels = DMatrix::from_fn(size, size, |row, col| {
        let x = ox + col as i64;
        let y = oy + row as i64;
        if x < w as i64 && y < h as i64 {
            frame.get_pixel(x as u32, y as u32)[0] as f32
        } else {
            0.0
        }
    });
    Crop { pixels, origin }
}
