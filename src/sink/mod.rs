//! Output sinks.
//!
//! # Data Flow
//! ```text
//! LogRecord on a target's stream (Logger or Provider)
//!     → adapter.rs (one listener per target per sink)
//!     → filter.rs (level allow-list)
//!     → console.rs: write line to stdout/stderr, synchronously
//!     → file.rs: enqueue on the target's write queue
//!         → worker task: resolve path → fs.rs ensure_dir → fs.rs append
//! ```
//!
//! # Design Decisions
//! - Every sink is built on `SinkAdapter`, so attach/detach semantics are uniform
//! - Filtering happens in the sink, never upstream
//! - File writes are serialized per target and never block the log call

pub mod adapter;
pub mod console;
pub mod file;
pub mod filter;
pub mod fs;

use crate::event::LoggingTarget;

pub use adapter::{SinkAdapter, SinkCallback};
pub use console::{ConsoleOptions, ConsoleOutput, ConsoleSink, StdConsole, Stream, TintMode};
pub use file::{FileOptions, FileSink, PathContext, PathResolver};
pub use filter::LevelFilter;
pub use fs::{LogFs, TokioFs};

/// A consumer of log records that can be attached to loggers and providers.
pub trait Sink: Send + Sync {
    fn on(&self, target: &dyn LoggingTarget);

    /// Detach from `target`; a no-op if it was never attached.
    fn off(&self, target: &dyn LoggingTarget);
}
