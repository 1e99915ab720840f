//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal or EOF → broadcast → run drain hooks (flush file queues) → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → caller triggers Shutdown::drain
//! ```
//!
//! # Design Decisions
//! - Dispatch never waits on sink I/O, so flushing is an explicit step
//! - Hooks run in registration order; one failure does not skip the rest

pub mod shutdown;
pub mod signals;

pub use shutdown::{Drain, Shutdown};
