//! Managed HTTP server lifecycle.
//!
//! # Responsibilities
//! - Start the axum accept loop on the configurator's bound listener
//! - Arm a watcher that turns token cancellation into graceful shutdown
//! - Coordinate the drain: single trigger, bounded deadline, forced cutoff
//!
//! # Design Decisions
//! - The "starting" log is emitted before the accept loop exists, so it
//!   always precedes the first served request
//! - A failed drain deadline aborts the serve task: remaining connections
//!   are dropped and the port is released immediately
//! - Serve failures after startup are logged, never returned; the fast-fail
//!   check at start only catches errors reported before it runs

use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::configurator::ServerConfigurator;
use crate::lifecycle::shutdown::ShutdownController;
use crate::lifecycle::signals;

/// Drain deadline used by the cancellation watcher armed in [`start_server`].
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors reported by the server lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configurator could not hand over a usable listener.
    #[error("listener unavailable: {0}")]
    Listener(#[source] io::Error),
    /// The serve loop failed before startup completed.
    #[error("http server failed to start: {0}")]
    Serve(#[source] io::Error),
    /// The serve loop reported an error while draining.
    #[error("http server failed during drain: {0}")]
    Drain(#[source] io::Error),
    /// In-flight requests did not finish within the deadline; the serve task
    /// was aborted and remaining connections dropped.
    #[error("graceful shutdown did not finish within {0:?}")]
    DrainTimeout(Duration),
    /// The serve task panicked or disappeared without reporting a result.
    #[error("http server task terminated unexpectedly")]
    ServeTaskFailed,
}

struct ServerInner {
    port: u16,
    configurator: Arc<dyn ServerConfigurator>,
    shutdown: ShutdownController,
    serve_result: Mutex<Option<oneshot::Receiver<io::Result<()>>>>,
    serve_task: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to a running HTTP server.
///
/// Bound to exactly one listener and one configurator, fixed at construction.
/// Cloning the handle shares the same underlying server.
#[derive(Clone)]
pub struct HttpServer {
    inner: Arc<ServerInner>,
}

/// Start serving on the configurator's listener.
///
/// Emits the "starting http server" info log, spawns the accept loop, and
/// arms a watcher that runs graceful shutdown (with [`DEFAULT_DRAIN_TIMEOUT`])
/// when `cancel` fires. A watcher-triggered shutdown failure is reported only
/// through the configurator's error log, never to the caller.
///
/// Returns an error without spawning anything if the listener is unavailable,
/// or if the serve loop reports a failure before the startup check runs.
/// Failures after that point surface only in logs.
pub async fn start_server<C>(
    cancel: CancellationToken,
    configurator: C,
) -> Result<HttpServer, ServerError>
where
    C: ServerConfigurator,
{
    start_server_with_timeout(cancel, configurator, DEFAULT_DRAIN_TIMEOUT).await
}

/// Like [`start_server`], with an explicit drain deadline for the watcher.
///
/// `watcher_drain_timeout` bounds the drain the watcher performs when
/// `cancel` fires; explicit calls to
/// [`shutdown_gracefully`](HttpServer::shutdown_gracefully) still pass their
/// own deadline.
pub async fn start_server_with_timeout<C>(
    cancel: CancellationToken,
    mut configurator: C,
    watcher_drain_timeout: Duration,
) -> Result<HttpServer, ServerError>
where
    C: ServerConfigurator,
{
    let listener = configurator.take_listener().map_err(ServerError::Listener)?;
    let port = listener
        .local_addr()
        .map_err(ServerError::Listener)?
        .port();
    let router = configurator.configure_routes();
    let configurator: Arc<dyn ServerConfigurator> = Arc::new(configurator);

    let shutdown = ShutdownController::new();
    let drain = shutdown.drain_token();

    configurator.log_info("starting http server", port);

    let (serve_tx, mut serve_rx) = oneshot::channel();
    let serve_task = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(drain.cancelled_owned())
            .await;
        if let Err(e) = &result {
            tracing::error!(port, error = %e, "http server exited with error");
        }
        let _ = serve_tx.send(result);
    });

    // Best-effort fast-fail: give the serve task one scheduling slot to report
    // an immediate error before the handle is handed out.
    tokio::task::yield_now().await;
    match serve_rx.try_recv() {
        Ok(Err(e)) => return Err(ServerError::Serve(e)),
        Ok(Ok(())) => {
            return Err(ServerError::Serve(io::Error::other(
                "serve loop exited before startup completed",
            )))
        }
        Err(oneshot::error::TryRecvError::Closed) => return Err(ServerError::ServeTaskFailed),
        Err(oneshot::error::TryRecvError::Empty) => {}
    }

    let server = HttpServer {
        inner: Arc::new(ServerInner {
            port,
            configurator,
            shutdown,
            serve_result: Mutex::new(Some(serve_rx)),
            serve_task: Mutex::new(Some(serve_task)),
        }),
    };

    let watcher = server.clone();
    tokio::spawn(async move {
        cancel.cancelled().await;
        if let Err(e) = watcher.shutdown_gracefully(watcher_drain_timeout).await {
            tracing::error!(port = watcher.inner.port, error = %e, "watcher shutdown failed");
            watcher
                .inner
                .configurator
                .log_error("could not shutdown http server gracefully", watcher.inner.port);
        }
    });

    Ok(server)
}

impl HttpServer {
    /// Port the server is bound to.
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Shut the server down gracefully.
    ///
    /// Stops accepting new connections and waits up to `drain_timeout` for
    /// in-flight requests to finish. On deadline expiry the serve task is
    /// aborted, remaining connections are dropped without completing, and
    /// [`ServerError::DrainTimeout`] is returned; the port is free either way.
    ///
    /// Concurrent and repeated calls collapse onto a single drain: the first
    /// caller performs it (and emits the single "shutting down" log), later
    /// callers wait for it to finish and return `Ok`.
    pub async fn shutdown_gracefully(&self, drain_timeout: Duration) -> Result<(), ServerError> {
        if !self.inner.shutdown.begin() {
            // Another trigger won the race; its outcome is reported on its
            // own return path.
            self.inner.shutdown.stopped().await;
            return Ok(());
        }

        self.inner
            .configurator
            .log_info("shutting down http server gracefully", self.inner.port);
        self.inner.shutdown.trigger_drain();

        let receiver = self.inner.serve_result.lock().await.take();
        let result = match receiver {
            Some(receiver) => match tokio::time::timeout(drain_timeout, receiver).await {
                Ok(Ok(Ok(()))) => Ok(()),
                Ok(Ok(Err(e))) => Err(ServerError::Drain(e)),
                Ok(Err(_)) => Err(ServerError::ServeTaskFailed),
                Err(_) => {
                    if let Some(task) = self.inner.serve_task.lock().await.take() {
                        task.abort();
                    }
                    Err(ServerError::DrainTimeout(drain_timeout))
                }
            },
            None => Ok(()),
        };

        self.inner.shutdown.mark_stopped();
        result
    }

    /// Block until shutdown is requested, then shut down gracefully.
    ///
    /// Shutdown is requested by SIGINT, SIGTERM (unix), or cancellation of
    /// `cancel`, whichever fires first. The explicit token exists so tests
    /// and multi-instance deployments do not depend on process-wide signal
    /// delivery. Returns the result of the drain, bounded by `drain_timeout`.
    pub async fn listen_and_handle_shutdown(
        &self,
        cancel: CancellationToken,
        drain_timeout: Duration,
    ) -> Result<(), ServerError> {
        signals::shutdown_requested(&cancel).await;
        self.shutdown_gracefully(drain_timeout).await
    }
}
