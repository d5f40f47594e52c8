//! Per-timestep duration estimation from solver logs.
//!
//! The solver periodically prints cumulative wall-clock markers
//! (`ExecutionTime = <secs> s`). This module scans the most recent
//! markers and derives a worst-case per-step duration that the
//! watchdog turns into a stop margin:
//!
//! 1. [`samples::read_samples`] collects up to [`SAMPLE_WINDOW`]
//!    markers, newest first
//! 2. [`estimate::estimate_from_samples`] takes pairwise differences,
//!    substitutes the raw value where a restart reset the clock, and
//!    keeps the maximum
//!
//! Missing or malformed data is never an error here: a wrong guess is
//! bounded by the safety factor, while aborting would waste the whole
//! reservation. Anything short of two usable samples degrades to
//! [`FALLBACK_STEP_SECS`].

pub mod estimate;
pub mod samples;

pub use estimate::{estimate_step, StepEstimate, FALLBACK_STEP_SECS};
pub use samples::{read_samples, scan_samples, SAMPLE_WINDOW};
