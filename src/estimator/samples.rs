use std::path::Path;

/// Marker printed by the solver once per timestep.
pub const EXECUTION_TIME_MARKER: &str = "ExecutionTime";

/// How many recent markers are retained for estimation.
pub const SAMPLE_WINDOW: usize = 10;

/// Collect up to `window` execution-time samples from a solver log,
/// newest first. A missing or unreadable log yields no samples.
pub fn read_samples(log: &Path, window: usize) -> Vec<f64> {
    match std::fs::read_to_string(log) {
        Ok(text) => scan_samples(&text, window),
        Err(e) => {
            tracing::debug!(log = %log.display(), error = %e, "No solver log to sample");
            Vec::new()
        }
    }
}

/// Scan log text bottom-up for `ExecutionTime = <secs> s` lines.
///
/// The numeric value is the third whitespace-delimited field of the
/// line; lines where that field does not parse are skipped.
pub fn scan_samples(text: &str, window: usize) -> Vec<f64> {
    let mut samples = Vec::with_capacity(window);
    for line in text.lines().rev() {
        if samples.len() == window {
            break;
        }
        if !line.contains(EXECUTION_TIME_MARKER) {
            continue;
        }
        if let Some(value) = line.split_whitespace().nth(2) {
            if let Ok(secs) = value.parse::<f64>() {
                samples.push(secs);
            }
        }
    }
    samples
}
