//! Shared utilities for lifecycle integration tests.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{http::StatusCode, routing::get, Router};
use servwrap::ServerConfigurator;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servwrap=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Log capture shared between a configurator and the test body.
#[derive(Clone, Default)]
pub struct LogSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogSink {
    pub fn record(&self, level: &str, message: &str) {
        self.lines.lock().unwrap().push(format!("{level}: {message}"));
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn count_of(&self, line: &str) -> usize {
        self.lines().iter().filter(|l| l.as_str() == line).count()
    }
}

/// Configurator used by the integration tests.
///
/// Serves "/" with 201 Created and "/slow" with a configurable delay, and
/// records every log callback into a [`LogSink`].
pub struct TestConfigurator {
    listener: Option<TcpListener>,
    slow_delay: Duration,
    pub logs: LogSink,
}

impl TestConfigurator {
    /// Bind to an ephemeral port on loopback.
    pub async fn bind_ephemeral() -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self {
            listener: Some(listener),
            slow_delay: Duration::from_millis(50),
            logs: LogSink::default(),
        }
    }

    /// Configurator whose listener is gone, as if it was already closed.
    #[allow(dead_code)]
    pub fn broken() -> Self {
        init_tracing();
        Self {
            listener: None,
            slow_delay: Duration::ZERO,
            logs: LogSink::default(),
        }
    }

    /// Set how long "/slow" takes to respond.
    #[allow(dead_code)]
    pub fn with_slow_delay(mut self, delay: Duration) -> Self {
        self.slow_delay = delay;
        self
    }
}

impl ServerConfigurator for TestConfigurator {
    fn take_listener(&mut self) -> io::Result<TcpListener> {
        self.listener
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "listener closed"))
    }

    fn configure_routes(&mut self) -> Router {
        let delay = self.slow_delay;
        Router::new()
            .route("/", get(|| async { (StatusCode::CREATED, "created") }))
            .route(
                "/slow",
                get(move || async move {
                    tokio::time::sleep(delay).await;
                    "done"
                }),
            )
    }

    fn log_error(&self, message: &str, _port: u16) {
        self.logs.record("error", message);
    }

    fn log_info(&self, message: &str, _port: u16) {
        self.logs.record("info", message);
    }
}

/// Whether a fresh listener can bind the port right now.
pub fn port_is_free(port: u16) -> bool {
    std::net::TcpListener::bind(("127.0.0.1", port)).is_ok()
}

/// Poll `condition` until it holds or `deadline` elapses.
pub async fn wait_until<F: Fn() -> bool>(deadline: Duration, condition: F) {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within {deadline:?}");
}
