use std::time::Duration;

use serde::Serialize;

use crate::error::{FoamrunError, Result};
use crate::walltime::Walltime;

/// Multiplier applied to the worst observed step duration.
pub const DEFAULT_SAFETY_FACTOR: f64 = 3.0;

/// Lower bound on the stop margin. Even a near-instant step must leave
/// the solver's exit telemetry time to flush before the hard kill.
pub const STOP_MARGIN_FLOOR_SECS: f64 = 5.0;

/// When to request the graceful stop, relative to job start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopSchedule {
    /// Margin reserved at the end of the walltime: the scaled worst
    /// step, floored at [`STOP_MARGIN_FLOOR_SECS`]
    pub stop_margin_secs: f64,
    /// How long the timer sleeps before requesting the stop
    pub safe_sleep_secs: f64,
}

impl StopSchedule {
    /// Place the stop margin inside the reservation.
    ///
    /// Fails with [`FoamrunError::ReservationTooShort`] when the
    /// margin does not fit: the reservation cannot accommodate even
    /// one more safe step, and launching would risk an ungraceful
    /// kill mid-write.
    pub fn plan(max_step_secs: f64, safety_factor: f64, walltime: Walltime) -> Result<Self> {
        let stop_margin = (max_step_secs * safety_factor).max(STOP_MARGIN_FLOOR_SECS);
        let total = walltime.total_seconds();
        let safe_sleep = total as f64 - stop_margin;

        if safe_sleep < 0.0 {
            return Err(FoamrunError::ReservationTooShort {
                total,
                scaled: stop_margin,
            });
        }

        Ok(Self {
            stop_margin_secs: stop_margin,
            safe_sleep_secs: safe_sleep,
        })
    }

    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs_f64(self.safe_sleep_secs)
    }
}
