//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Bound listener + Router (from the ServerConfigurator)
//!     → server.rs (serve task, watcher task, shutdown handle)
//!     → axum accept loop until drain is triggered
//! ```

pub mod server;

pub use server::{
    start_server, start_server_with_timeout, HttpServer, ServerError, DEFAULT_DRAIN_TIMEOUT,
};
