//! High-level repair API.
//!
//! [`Repairer`] is the primary entry point for repairing laser-point
//! trajectories. It wraps a [`RepairConfig`] and runs the full pipeline on
//! one [`RepairInput`] at a time.

use crate::pipeline::{self, RepairInput, RepairResult};
use crate::{RepairConfig, RepairError};

/// Primary repair interface.
///
/// Create once, repair many recordings.
///
/// # Examples
///
/// ```no_run
/// use vfpoints::{FrameStack, RepairInput, Repairer, TrackTable};
///
/// let detections = TrackTable::default();
/// let video = FrameStack::default();
/// let repairer = Repairer::new();
/// let result = repairer
///     .repair(&RepairInput::new(&detections, &[], &video))
///     .unwrap();
/// println!("{} markers lost", result.stats.n_lost_markers);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Repairer {
    config: RepairConfig,
}

impl Repairer {
    /// Create a repairer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: RepairConfig) -> Self {
        Self { config }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut RepairConfig {
        &mut self.config
    }

    /// Repair every trajectory of one recording.
    ///
    /// Fails only on an unusable configuration or inconsistent input sizes;
    /// markers that cannot be recovered come back as `None` samples.
    pub fn repair(&self, input: &RepairInput<'_>) -> Result<RepairResult, RepairError> {
        pipeline::run(input, &self.config)
    }
}

/// One-shot repair with an explicit configuration.
pub fn repair_tracks(
    input: &RepairInput<'_>,
    config: &RepairConfig,
) -> Result<RepairResult, RepairError> {
    pipeline::run(input, config)
}
