//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Trigger shutdown when the process receives Ctrl+C.
///
/// If the handler cannot be installed the error is logged and the process
/// runs without signal-driven shutdown.
pub async fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install Ctrl+C handler");
        return;
    }
    shutdown.trigger();
}
