//! Repair pipeline.
//!
//! This module is the glue layer that wires the stages together:
//! run labeling -> refinement -> gap interpolation -> border fill ->
//! smoothing (per marker, in parallel) -> mask filtering (per frame).
//!
//! The stage algorithms live in their own modules; the pipeline owns input
//! validation, call order, statistics and logging.

mod input;
mod marker;
mod result;
mod run;

pub use input::RepairInput;
pub use result::{RepairResult, RepairStats};

pub(crate) use run::run;
