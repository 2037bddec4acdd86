//! Tracing subscriber setup.

use tracing_subscriber::util::TryInitError;

/// Install a global fmt subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence over `level` when set. Fails if a global
/// subscriber is already installed, which tests can safely ignore.
pub fn init_tracing(level: &str) -> Result<(), TryInitError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
}
