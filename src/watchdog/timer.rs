use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::solver::{SolverControl, StopMode};

/// Armed graceful-stop timer.
///
/// Sleeps for the safe interval, then asks the solver to write its
/// fields and stop. Disarming cancels the sleep without sending
/// anything; a timer that already fired cannot be unfired.
pub struct StopTimer {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl StopTimer {
    pub fn arm(delay: Duration, control: Arc<dyn SolverControl>) -> Self {
        let cancel = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));

        let task_cancel = cancel.clone();
        let task_fired = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancel.cancelled() => {
                    tracing::debug!("Stop timer disarmed");
                }
                _ = tokio::time::sleep(delay) => {
                    task_fired.store(true, Ordering::SeqCst);
                    tracing::info!(
                        delay_secs = delay.as_secs_f64(),
                        "Safe runtime exhausted, requesting graceful stop"
                    );
                    if let Err(e) = control.request(StopMode::WriteAndStop).await {
                        tracing::error!(error = %e, "Graceful stop request failed");
                    }
                }
            }
        });

        Self {
            handle,
            cancel,
            fired,
        }
    }

    /// Cancel the pending stop request. No effect once fired.
    pub fn disarm(&self) {
        self.cancel.cancel();
    }

    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Wait for the timer task to settle; returns whether it fired.
    pub async fn join(self) -> bool {
        let _ = self.handle.await;
        self.fired.load(Ordering::SeqCst)
    }
}
