//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Trigger (token or signal) → phase CAS → drain → stopped
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM or explicit token → shutdown requested
//! ```
//!
//! # Design Decisions
//! - Phase machine (running → draining → stopped) makes shutdown idempotent:
//!   the first trigger drains, later triggers wait for completion
//! - Shutdown has a caller-provided deadline: forced cutoff after it expires

pub mod shutdown;
pub mod signals;
