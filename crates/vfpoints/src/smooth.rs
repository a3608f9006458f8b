//! Temporal Gaussian smoothing of trajectories.

use crate::Sample;

/// Parameters of the 1-D Gaussian smoother.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmoothConfig {
    /// Master enable switch.
    pub enable: bool,
    /// Kernel length in frames (odd).
    pub kernel_size: usize,
    /// Gaussian standard deviation in frames.
    pub sigma: f64,
    /// Trajectories with fewer resolved samples are left unchanged.
    pub min_valid_samples: usize,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            enable: true,
            kernel_size: 5,
            sigma: 1.0,
            min_valid_samples: 10,
        }
    }
}

/// Discrete Gaussian kernel of length `size`, centered, summing to 1.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }
    let center = (size - 1) as f64 / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Convolve `values` with `kernel` after replicate-padding both ends.
fn convolve_replicate(values: &[f64], kernel: &[f64]) -> Vec<f64> {
    let half = kernel.len() / 2;
    let n = values.len() as isize;
    (0..values.len())
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let j = (i as isize + k as isize - half as isize).clamp(0, n - 1);
                    w * values[j as usize]
                })
                .sum()
        })
        .collect()
}

/// Smooth the resolved samples of one trajectory along time.
///
/// Each maximal run of consecutive resolved frames is convolved on its own,
/// per coordinate, with replicate padding at both ends of the run. Unresolved
/// frames are neither treated as zeros nor bridged, so samples on either side
/// of a gap never mix. `None` frames stay `None`.
///
/// The `min_valid_samples` threshold applies to the whole trajectory.
pub fn smooth_trajectory(samples: &[Sample], config: &SmoothConfig) -> Vec<Sample> {
    let mut out = samples.to_vec();
    let n_valid = samples.iter().filter(|s| s.is_some()).count();
    if n_valid == 0 || n_valid < config.min_valid_samples {
        return out;
    }

    let kernel = gaussian_kernel(config.kernel_size, config.sigma);
    if kernel.is_empty() || kernel.iter().any(|w| !w.is_finite()) {
        return out;
    }

    let mut t = 0;
    while t < samples.len() {
        if samples[t].is_none() {
            t += 1;
            continue;
        }
        let start = t;
        let run: Vec<[f64; 2]> = samples[start..].iter().map_while(|s| *s).collect();
        t += run.len();

        let xs: Vec<f64> = run.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = run.iter().map(|p| p[1]).collect();
        let sx = convolve_replicate(&xs, &kernel);
        let sy = convolve_replicate(&ys, &kernel);
        for (i, (x, y)) in sx.into_iter().zip(sy).enumerate() {
            out[start + i] = Some([x, y]);
        }
    }
    out
}
