//! Shared test utilities for image-based unit tests.
//!
//! Synthetic laser spots and segmentation masks, so refinement and pipeline
//! tests do not each carry their own renderer.

use image::{GrayImage, Luma};

/// Render isotropic Gaussian spots on a flat background.
///
/// Pixel value is `bg + amp * sum(exp(-d^2 / (2 sigma^2)))`, rounded and
/// clamped to `u8`. Spots centered on integer pixels are exactly symmetric.
pub(crate) fn draw_spots(
    w: u32,
    h: u32,
    centers: &[[f64; 2]],
    sigma: f64,
    amp: f64,
    bg: f64,
) -> GrayImage {
    let two_sigma_sq = 2.0 * sigma * sigma;
    GrayImage::from_fn(w, h, |x, y| {
        let mut v = bg;
        for c in centers {
            let dx = x as f64 - c[0];
            let dy = y as f64 - c[1];
            v += amp * (-(dx * dx + dy * dy) / two_sigma_sq).exp();
        }
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

pub(crate) fn draw_spot(
    w: u32,
    h: u32,
    center: [f64; 2],
    sigma: f64,
    amp: f64,
    bg: f64,
) -> GrayImage {
    draw_spots(w, h, &[center], sigma, amp, bg)
}

/// Binary mask (0 / 255) with a filled disk.
pub(crate) fn disk_mask(w: u32, h: u32, center: (i32, i32), radius: i32) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    imageproc::drawing::draw_filled_circle_mut(&mut img, center, radius, Luma([255u8]));
    img
}

/// Filled disk blurred via `imageproc`, a softer stand-in for a real reflection.
pub(crate) fn blurred_disk(
    w: u32,
    h: u32,
    center: (i32, i32),
    radius: i32,
    sigma: f32,
) -> GrayImage {
    let disk = disk_mask(w, h, center, radius);
    let mut f = image::ImageBuffer::<Luma<f32>, Vec<f32>>::new(w, h);
    for y in 0..h {
        for x in 0..w {
            f.put_pixel(x, y, Luma([disk.get_pixel(x, y)[0] as f32 / 255.0]));
        }
    }
    let blurred = imageproc::filter::gaussian_blur_f32(&f, sigma);
    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = blurred.get_pixel(x, y)[0].clamp(0.0, 1.0);
            out.put_pixel(x, y, Luma([(v * 255.0).round() as u8]));
        }
    }
    out
}
