//! Internal diagnostics.
//!
//! # Responsibilities
//! - Install the `tracing` subscriber used for logbus's own diagnostics
//!   (sink attach/detach, write failures, queue lifecycle)
//!
//! # Design Decisions
//! - Diagnostics are separate from the records logbus dispatches
//! - `RUST_LOG` wins over the configured filter
//! - Diagnostics go to stderr so they never interleave with console sink stdout

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global fmt subscriber filtered by `RUST_LOG` or `default_filter`.
pub fn init_diagnostics(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}
