//! Collaborator contract for server configuration.
//!
//! # Responsibilities
//! - Hand over a bound TCP listener (bind errors stay with the caller)
//! - Provide the request router
//! - Provide the two log entry points the lifecycle layer reports through
//!
//! # Design Decisions
//! - One trait with four capabilities; one conforming type per application
//! - Supplied once at start, immutable for the lifetime of the server

use std::io;

use axum::Router;
use tokio::net::TcpListener;

/// Capability set supplied by the embedding application.
///
/// The lifecycle layer calls `log_info` at exactly two points ("starting http
/// server" and "shutting down http server gracefully") and `log_error` at one
/// (a failed watcher-triggered shutdown). Everything else is opaque to it.
pub trait ServerConfigurator: Send + Sync + 'static {
    /// Hand over the bound listener. Called exactly once by
    /// [`start_server`](crate::start_server).
    ///
    /// Returning `Err` means the listener is unavailable (for example already
    /// closed or already taken); `start_server` fails without spawning tasks.
    fn take_listener(&mut self) -> io::Result<TcpListener>;

    /// Build the router served on the listener. Routes are opaque to the
    /// lifecycle layer and are served without transformation.
    fn configure_routes(&mut self) -> Router;

    /// Emit an error-level log line tagged with the bound port.
    fn log_error(&self, message: &str, port: u16);

    /// Emit an info-level log line tagged with the bound port.
    fn log_info(&self, message: &str, port: u16);
}
