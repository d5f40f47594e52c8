use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FoamrunError;

/// Wall-clock length of the batch reservation, as granted by the
/// scheduler. Kept in the scheduler's own day/hour/minute/second
/// split so the submission script and the watchdog agree on the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walltime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Walltime {
    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        ((self.days * 24 + self.hours) * 60 + self.minutes) * 60 + self.seconds
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds())
    }

    /// Normalize a raw second count back into a day/hour/minute/second
    /// split, carrying overflow upward.
    pub fn from_total_seconds(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Walltime {
    /// Renders in the scheduler's `[D-]HH:MM:SS` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(
                f,
                "{}-{:02}:{:02}:{:02}",
                self.days, self.hours, self.minutes, self.seconds
            )
        } else {
            write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        }
    }
}

impl FromStr for Walltime {
    type Err = FoamrunError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || FoamrunError::InvalidWalltime(value.to_string());

        let (days, hms) = match value.split_once('-') {
            Some((d, rest)) => (d.parse().map_err(|_| invalid())?, rest),
            None => (0, value),
        };

        let fields: Vec<&str> = hms.split(':').collect();
        if fields.len() != 3 {
            return Err(invalid());
        }
        let hours = fields[0].parse().map_err(|_| invalid())?;
        let minutes: u64 = fields[1].parse().map_err(|_| invalid())?;
        let seconds: u64 = fields[2].parse().map_err(|_| invalid())?;
        if minutes > 59 || seconds > 59 {
            return Err(invalid());
        }

        Ok(Self::new(days, hours, minutes, seconds))
    }
}
