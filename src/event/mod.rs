//! Events emitted by loggers and providers.
//!
//! # Data Flow
//! ```text
//! Logger::log
//!     → LoggerEvent::Log on the logger's own ObserverList
//!     → ProviderEvent::Log on the owning provider's ObserverList
//! Provider::create_logger
//!     → ProviderEvent::LoggerCreated
//! ```
//!
//! # Design Decisions
//! - One closed enum per emitter instead of string-keyed events
//! - Sinks attach through `LoggingTarget`, which only exposes the log stream

pub mod observer;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logger::{LogRecord, Logger};

pub use observer::{Listener, ListenerId, ObserverList};

/// Events emitted by a [`Logger`].
#[derive(Debug, Clone)]
pub enum LoggerEvent {
    Log(Arc<LogRecord>),
}

/// Payload of [`ProviderEvent::LoggerCreated`].
#[derive(Debug, Clone)]
pub struct LoggerCreated {
    pub id: Uuid,
    pub logger: Logger,
    pub channel: Option<String>,
    pub time: DateTime<Utc>,
}

/// Events emitted by a [`Provider`](crate::provider::Provider).
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// A record bubbled up from one of the provider's loggers.
    Log(Arc<LogRecord>),
    LoggerCreated(LoggerCreated),
}

/// Callback attached to a target's log stream.
pub type LogListener = Arc<dyn Fn(&Arc<LogRecord>) + Send + Sync>;

/// Anything a sink can attach to.
pub trait LoggingTarget {
    fn id(&self) -> Uuid;

    /// Register `listener` for every record this target emits.
    fn subscribe_log(&self, listener: LogListener) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId) -> bool;
}
