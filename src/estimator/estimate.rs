use std::path::Path;

use serde::Serialize;

use crate::estimator::samples::read_samples;

/// Step-duration guess used when the log yields fewer than 2 samples.
pub const FALLBACK_STEP_SECS: f64 = 3000.0;

/// Worst-case duration of one solver timestep, derived from recent
/// execution-time samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepEstimate {
    /// Largest observed (or guessed) per-step duration in seconds
    pub max_step_secs: f64,
    /// How many samples backed the estimate
    pub samples_used: usize,
    /// True when the estimate is the fallback guess
    pub fallback: bool,
}

impl StepEstimate {
    fn from_fallback(fallback_secs: f64, samples_used: usize) -> Self {
        Self {
            max_step_secs: fallback_secs,
            samples_used,
            fallback: true,
        }
    }
}

/// Derive the worst per-step duration from newest-first samples.
///
/// Consecutive samples are differenced (newer minus older). A negative
/// difference means the solver restarted and its clock reset, so the
/// newer sample's raw value is the time spent since the restart and is
/// used as that step's duration.
pub fn estimate_from_samples(samples: &[f64], fallback_secs: f64) -> StepEstimate {
    if samples.len() < 2 {
        return StepEstimate::from_fallback(fallback_secs, samples.len());
    }

    let mut max_step = f64::NEG_INFINITY;
    for pair in samples.windows(2) {
        let (newer, older) = (pair[0], pair[1]);
        let diff = newer - older;
        let step = if diff < 0.0 { newer } else { diff };
        if step > max_step {
            max_step = step;
        }
    }

    StepEstimate {
        max_step_secs: max_step,
        samples_used: samples.len(),
        fallback: false,
    }
}

/// Estimate the worst per-step duration from a solver log.
///
/// Every failure mode (missing log, too few markers, malformed fields)
/// degrades to the fallback guess.
pub fn estimate_step(log: &Path, window: usize, fallback_secs: f64) -> StepEstimate {
    let samples = read_samples(log, window);
    let estimate = estimate_from_samples(&samples, fallback_secs);
    if estimate.fallback {
        tracing::info!(
            log = %log.display(),
            samples = estimate.samples_used,
            fallback_secs,
            "Too few execution-time samples, using fallback step duration"
        );
    } else {
        tracing::info!(
            log = %log.display(),
            samples = estimate.samples_used,
            max_step_secs = estimate.max_step_secs,
            "Estimated worst step duration from solver log"
        );
    }
    estimate
}
