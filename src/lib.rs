//! Minimal lifecycle wrapper for axum HTTP servers.
//!
//! The crate is deliberately unopinionated about routing and logging: the
//! embedding application supplies both through a [`ServerConfigurator`], and
//! this layer only coordinates start and graceful shutdown.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ServerConfigurator (listener + router)
//!         → start_server (port extraction, "starting" log)
//!         → serve task (axum accept loop)
//!         → watcher task (cancellation → graceful shutdown)
//!
//! Shutdown (either trigger, first one wins):
//!     CancellationToken fires ─┐
//!     SIGINT / SIGTERM ────────┴→ shutdown_gracefully
//!         → "shutting down" log → stop accepting → drain in-flight
//!         → done, or DrainTimeout (connections cut, port freed)
//! ```
//!
//! # Design Decisions
//! - The listener must already be bound; bind errors belong to the caller
//! - Shutdown is guarded by a phase machine: concurrent triggers collapse
//!   into a single drain
//! - OS signals are combined with an explicit token so test harnesses and
//!   multiple instances never share global signal state
//!
//! # Example
//! ```no_run
//! use axum::{http::StatusCode, routing::get, Router};
//! use servwrap::{start_server, ServerConfigurator, DEFAULT_DRAIN_TIMEOUT};
//! use tokio::net::TcpListener;
//! use tokio_util::sync::CancellationToken;
//!
//! struct MyConfigurator {
//!     listener: Option<TcpListener>,
//! }
//!
//! impl ServerConfigurator for MyConfigurator {
//!     fn take_listener(&mut self) -> std::io::Result<TcpListener> {
//!         self.listener
//!             .take()
//!             .ok_or_else(|| std::io::Error::other("listener already taken"))
//!     }
//!
//!     fn configure_routes(&mut self) -> Router {
//!         Router::new().route("/", get(|| async { StatusCode::OK }))
//!     }
//!
//!     fn log_info(&self, message: &str, port: u16) {
//!         tracing::info!(port, "{message}");
//!     }
//!
//!     fn log_error(&self, message: &str, port: u16) {
//!         tracing::error!(port, "{message}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let configurator = MyConfigurator { listener: Some(listener) };
//!
//!     let cancel = CancellationToken::new();
//!     let server = start_server(cancel.clone(), configurator).await?;
//!
//!     // Block until SIGINT/SIGTERM (or `cancel` fires), then drain.
//!     server
//!         .listen_and_handle_shutdown(cancel, DEFAULT_DRAIN_TIMEOUT)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod configurator;
pub mod http;
pub mod lifecycle;

pub use configurator::ServerConfigurator;
pub use http::server::{
    start_server, start_server_with_timeout, HttpServer, ServerError, DEFAULT_DRAIN_TIMEOUT,
};
pub use lifecycle::shutdown::ShutdownController;
