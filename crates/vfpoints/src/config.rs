//! Top-level repair configuration.

use std::path::Path;

use crate::mask::MaskFilterConfig;
use crate::refine::RefineConfig;
use crate::runs::RunConfig;
use crate::smooth::SmoothConfig;
use crate::window::WindowConfig;
use crate::RepairError;

/// All tunables of one repair run.
///
/// Every section falls back to its default, so a partial JSON document is a
/// valid configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Run-length labeling (interpolatable gap length).
    pub runs: RunConfig,
    /// Crop extracted around each detection.
    pub window: WindowConfig,
    /// Moment-method sub-window.
    pub refine: RefineConfig,
    /// Temporal Gaussian smoothing.
    pub smoothing: SmoothConfig,
    /// Replicate the first/last resolved sample into border frames.
    pub border_fill: bool,
    /// Segmentation-mask rejection.
    pub mask_filter: MaskFilterConfig,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            runs: RunConfig::default(),
            window: WindowConfig::default(),
            refine: RefineConfig::default(),
            smoothing: SmoothConfig::default(),
            border_fill: true,
            mask_filter: MaskFilterConfig::default(),
        }
    }
}

impl RepairConfig {
    /// Reject values the stages cannot work with.
    pub fn validate(&self) -> Result<(), RepairError> {
        let margin = self.refine.sub_window_radius.max(1);
        if self.window.radius < margin {
            return Err(RepairError::InvalidConfig(format!(
                "window radius {} cannot host a sub-window of radius {} inside a 1-pixel border",
                self.window.radius, self.refine.sub_window_radius
            )));
        }
        let s = &self.smoothing;
        if s.enable {
            if s.kernel_size == 0 || s.kernel_size % 2 == 0 {
                return Err(RepairError::InvalidConfig(format!(
                    "smoothing kernel size must be odd and positive, got {}",
                    s.kernel_size
                )));
            }
            if !(s.sigma.is_finite() && s.sigma > 0.0) {
                return Err(RepairError::InvalidConfig(format!(
                    "smoothing sigma must be positive, got {}",
                    s.sigma
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RepairError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RepairError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RepairConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.runs.max_gap, 5);
        assert_eq!(cfg.window.size(), 7);
        assert_eq!(cfg.smoothing.kernel_size, 5);
        assert!(cfg.border_fill);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg = RepairConfig::from_json_str(r#"{"runs":{"max_gap":3},"smoothing":{"sigma":2.0}}"#)
            .expect("valid config");
        assert_eq!(cfg.runs.max_gap, 3);
        assert_eq!(cfg.smoothing.sigma, 2.0);
        assert_eq!(cfg.smoothing.kernel_size, 5);
        assert_eq!(cfg.window.radius, 3);
        assert!(cfg.border_fill);
        assert!(cfg.mask_filter.enable);
    }

    #[test]
    fn even_kernel_is_rejected() {
        let err = RepairConfig::from_json_str(r#"{"smoothing":{"kernel_size":4}}"#)
            .expect_err("even kernel");
        assert!(matches!(err, RepairError::InvalidConfig(_)));
    }

    #[test]
    fn disabled_smoothing_skips_kernel_checks() {
        let mut cfg = RepairConfig::default();
        cfg.smoothing.enable = false;
        cfg.smoothing.kernel_size = 0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn window_must_host_sub_window() {
        let mut cfg = RepairConfig::default();
        cfg.window.radius = 0;
        assert!(cfg.validate().is_err());
        cfg.window.radius = 2;
        cfg.refine.sub_window_radius = 3;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_serializes_round_trip_through_json() {
        let cfg = RepairConfig::default();
        let raw = serde_json::to_string(&cfg).expect("serialize");
        let back = RepairConfig::from_json_str(&raw).expect("parse");
        assert_eq!(back.runs.max_gap, cfg.runs.max_gap);
        assert_eq!(back.smoothing.min_valid_samples, cfg.smoothing.min_valid_samples);
    }
}
