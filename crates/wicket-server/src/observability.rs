// Basic tracing initialization with env-configurable log level.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes the global tracing subscriber.
///
/// Prefers `RUST_LOG` from the environment, otherwise defaults to
/// `info`. Safe to call more than once (subsequent calls are no-ops),
/// which keeps tests that share a process from panicking.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
