use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Install a shutdown handler for the scheduler's warning signals.
///
/// SLURM delivers SIGTERM shortly before the hard walltime kill, and
/// sites often configure an earlier SIGUSR1 via `--signal`. Either one
/// (or an interactive SIGINT) cancels the returned token; the watchdog
/// reacts by requesting the graceful stop immediately instead of
/// waiting for the armed timer.
pub fn install_shutdown_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        let mut sigusr1 =
            signal(SignalKind::user_defined1()).expect("failed to install SIGUSR1 handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, walltime kill imminent");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT");
            }
            _ = sigusr1.recv() => {
                tracing::info!("Received SIGUSR1 walltime warning");
            }
        }

        token_clone.cancel();
    });

    token
}
