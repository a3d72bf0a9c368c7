//! OS signal handling.
//!
//! # Responsibilities
//! - Register interest in SIGINT and SIGTERM (async-safe, via Tokio)
//! - Combine signals with an explicit cancellation token
//!
//! # Design Decisions
//! - The token keeps signal handling testable: a harness cancels the token
//!   instead of delivering a real signal, and multiple server instances do
//!   not contend on process-wide signal state

use tokio_util::sync::CancellationToken;

/// Wait until shutdown is requested.
///
/// Resolves on SIGINT (all platforms), SIGTERM (unix), or cancellation of
/// `cancel`, whichever fires first.
pub async fn shutdown_requested(cancel: &CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutdown requested");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutdown requested");
        },
        _ = cancel.cancelled() => {
            tracing::info!("Cancellation token fired, shutdown requested");
        },
    }
}
