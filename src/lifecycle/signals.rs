//! OS signal handling.
//!
//! SIGTERM (container stop) and SIGINT (Ctrl+C) both request a graceful
//! shutdown. A second signal while draining forces an immediate exit.

use crate::lifecycle::Shutdown;

/// Which signal ended the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

impl std::fmt::Display for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopSignal::Interrupt => f.write_str("SIGINT"),
            StopSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for the next SIGINT or SIGTERM.
#[cfg(unix)]
pub async fn wait_for_stop_signal() -> std::io::Result<StopSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| StopSignal::Interrupt),
        _ = terminate.recv() => Ok(StopSignal::Terminate),
    }
}

/// Wait for the next Ctrl+C.
#[cfg(not(unix))]
pub async fn wait_for_stop_signal() -> std::io::Result<StopSignal> {
    tokio::signal::ctrl_c().await.map(|_| StopSignal::Interrupt)
}

/// Translate stop signals into a shutdown trigger.
///
/// The first signal triggers `shutdown`. A second one exits the process
/// with status 130 without waiting for the drain to finish.
pub fn spawn_signal_listener(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_stop_signal().await {
            Ok(signal) => {
                tracing::info!(signal = %signal, "Shutdown signal received");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handlers");
                return;
            }
        }

        if let Ok(signal) = wait_for_stop_signal().await {
            tracing::warn!(signal = %signal, "Second signal received, exiting without drain");
            std::process::exit(130);
        }
    })
}
