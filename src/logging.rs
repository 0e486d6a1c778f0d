//! Logging setup for the `mailslice` binary.
//!
//! Installs a global `tracing` subscriber that writes to stderr, filtered by `RUST_LOG`
//! (default `info`). The library only emits events; it never installs a subscriber itself.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize tracing. Subsequent calls are no-ops.
pub fn init() -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(build_env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    let _ = INITIALIZED.set(());

    tracing::debug!("logging initialized");
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
