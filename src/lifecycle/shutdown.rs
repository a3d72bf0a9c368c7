//! Shutdown coordination for the managed server.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio_util::sync::CancellationToken;

const RUNNING: u8 = 0;
const DRAINING: u8 = 1;
const STOPPED: u8 = 2;

/// Coordinator for graceful shutdown.
///
/// Tracks the lifecycle phase (running → draining → stopped) and carries two
/// notifications: the drain trigger consumed by the serve loop's graceful
/// future, and a completion signal for shutdown callers that lost the race to
/// trigger the drain themselves.
pub struct ShutdownController {
    phase: AtomicU8,
    drain: CancellationToken,
    done: CancellationToken,
}

impl ShutdownController {
    /// Create a coordinator in the running phase.
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(RUNNING),
            drain: CancellationToken::new(),
            done: CancellationToken::new(),
        }
    }

    /// Claim the transition from running to draining.
    ///
    /// Returns `true` for exactly one caller; everyone else should wait on
    /// [`stopped`](Self::stopped) instead of starting a second drain.
    pub fn begin(&self) -> bool {
        self.phase
            .compare_exchange(RUNNING, DRAINING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Tell the serve loop to stop accepting and drain in-flight requests.
    pub fn trigger_drain(&self) {
        self.drain.cancel();
    }

    /// Token the serve loop's graceful-shutdown future waits on.
    pub fn drain_token(&self) -> CancellationToken {
        self.drain.clone()
    }

    /// Record that the drain finished (successfully or not) and wake waiters.
    pub fn mark_stopped(&self) {
        self.phase.store(STOPPED, Ordering::Release);
        self.done.cancel();
    }

    /// Wait until the winning shutdown caller has finished draining.
    pub async fn stopped(&self) {
        self.done.cancelled().await;
    }

    /// Whether the drain has finished.
    pub fn is_stopped(&self) -> bool {
        self.phase.load(Ordering::Acquire) == STOPPED
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
