//! logbus: leveled logging façade with pluggable sinks.
//!
//! A [`Provider`] owns formatting configuration and creates [`Logger`]s.
//! Every log call produces one immutable [`LogRecord`], published first to
//! the logger's listeners and then to its provider's. Sinks attach to either
//! stream; attaching a sink to a target twice replaces the earlier attachment.

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod level;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod provider;
pub mod sink;

pub use error::{GlobalError, SinkError};
pub use event::{LoggerCreated, LoggerEvent, LoggingTarget, ProviderEvent};
pub use format::{Aggregate, ArgValue, Failure, LogArg};
pub use level::{LevelRegistry, LogLevel, Tint, TintColor};
pub use lifecycle::Shutdown;
pub use logger::{LogRecord, Logger};
pub use provider::{Provider, ProviderOptions};
pub use sink::{ConsoleSink, FileSink, Sink};
