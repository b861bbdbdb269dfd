use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Install a handler for SIGTERM and SIGINT.
///
/// Returns a `CancellationToken` cancelled on the first signal received.
/// The lease service run loop and any subscription drivers watch this
/// token and wind down between ticks.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let handler = token.clone();

    tokio::spawn(async move {
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, draining");
            }
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received, draining");
            }
        }

        handler.cancel();
    });

    token
}
