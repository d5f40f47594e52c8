//! Reservation watchdog.
//!
//! Turns a step estimate into a stop schedule and supervises the
//! solver run against it:
//!
//! - [`schedule`]: arithmetic only. Scales the worst step by the
//!   safety factor, floors the margin at 5 s, and subtracts it from
//!   the reservation. A negative remainder is fatal before anything
//!   is launched.
//! - [`timer`]: the armed delayed action. Sleeps for the safe
//!   interval, then sends [`StopMode::WriteAndStop`](crate::solver::StopMode)
//!   through the control channel. Cancellable, so a solver that exits
//!   on its own disarms it cleanly.
//!
//! [`supervise`] ties both to the foreground solver process and maps
//! the ending to the run's terminal state: the solver finishing first
//! is `Completed`, a stop request beating it is `GracefulStop`.

pub mod schedule;
pub mod timer;

pub use schedule::{StopSchedule, DEFAULT_SAFETY_FACTOR, STOP_MARGIN_FLOOR_SECS};
pub use timer::StopTimer;

use std::fmt;
use std::process::ExitStatus;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::solver::{SolverControl, SolverLauncher, StopMode};

/// Terminal state of a supervised run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Solver exited on its own before the stop margin was reached
    Completed(ExitStatus),
    /// A graceful stop was requested (timer fired or the scheduler
    /// signalled) and the solver exited afterwards
    GracefulStop(ExitStatus),
}

impl RunOutcome {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            RunOutcome::Completed(s) | RunOutcome::GracefulStop(s) => *s,
        }
    }

    /// Process exit code to propagate. A signal-terminated solver has
    /// no code and is reported as failure.
    pub fn exit_code(&self) -> i32 {
        self.exit_status().code().unwrap_or(1)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed(_) => write!(f, "completed"),
            RunOutcome::GracefulStop(_) => write!(f, "graceful-stop"),
        }
    }
}

/// Run the solver under the stop schedule.
///
/// Arms the stop timer, launches the solver in the foreground, and
/// waits. If the scheduler's shutdown signal arrives first, the
/// graceful stop is requested immediately instead of at the scheduled
/// time. The timer is disarmed once the solver has exited.
pub async fn supervise(
    schedule: StopSchedule,
    launcher: &SolverLauncher,
    control: Arc<dyn SolverControl>,
    shutdown: CancellationToken,
) -> Result<RunOutcome> {
    let mut child = launcher.spawn()?;
    let timer = StopTimer::arm(schedule.sleep_duration(), Arc::clone(&control));

    let mut signal_stop = false;
    let exit_status = loop {
        tokio::select! {
            status = child.wait() => break status?,
            _ = shutdown.cancelled(), if !signal_stop => {
                tracing::warn!("Shutdown signal received, requesting graceful stop early");
                signal_stop = true;
                timer.disarm();
                if let Err(e) = control.request(StopMode::WriteAndStop).await {
                    tracing::error!(error = %e, "Early graceful stop request failed");
                }
            }
        }
    };

    timer.disarm();
    let timer_fired = timer.join().await;

    let outcome = if timer_fired || signal_stop {
        RunOutcome::GracefulStop(exit_status)
    } else {
        RunOutcome::Completed(exit_status)
    };
    tracing::info!(outcome = %outcome, exit_code = outcome.exit_code(), "Solver run finished");
    Ok(outcome)
}
