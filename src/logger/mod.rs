//! Loggers and the records they produce.
//!
//! # Responsibilities
//! - Turn a log call into an immutable `LogRecord`
//! - Publish the record to the logger's own listeners, then to its provider
//!
//! # Design Decisions
//! - No I/O happens here; output is entirely the job of attached sinks
//! - Formatting is read from the provider on every call (live configuration)
//! - Publication is synchronous, so records are observed in call order

pub mod macros;
pub mod record;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::event::{Listener, ListenerId, LogListener, LoggerEvent, LoggingTarget, ObserverList, ProviderEvent};
use crate::format::{ArgValue, LineParts, LogArg};
use crate::level::LogLevel;
use crate::observability::metrics;
use crate::provider::ProviderShared;

pub use record::LogRecord;

struct LoggerInner {
    id: Uuid,
    channel: Option<String>,
    provider: Arc<ProviderShared>,
    observers: ObserverList<LoggerEvent>,
}

/// A per-channel emitter. Clones share identity and listeners.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub(crate) fn new(provider: Arc<ProviderShared>, channel: Option<String>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                id: Uuid::new_v4(),
                channel,
                provider,
                observers: ObserverList::new(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn channel(&self) -> Option<&str> {
        self.inner.channel.as_deref()
    }

    /// Id of the provider that created this logger.
    pub fn provider_id(&self) -> Uuid {
        self.inner.provider.id
    }

    /// Format `args` at `level` and publish the resulting record.
    pub fn log<I>(&self, level: &LogLevel, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        let timestamp = Utc::now();
        let formatting = self.inner.provider.formatting.load();

        let args: Vec<ArgValue> = args.into_iter().map(|arg| arg.into().resolve()).collect();
        let messages: Vec<String> = args
            .iter()
            .map(|arg| formatting.format_entry(arg.clone().into()))
            .collect();

        let line = formatting.format_line(&LineParts {
            time: timestamp,
            level,
            channel: self.channel(),
            messages: &messages,
        });

        let record = Arc::new(LogRecord {
            id: Uuid::new_v4(),
            logger_id: self.inner.id,
            level: level.clone(),
            args,
            messages,
            line,
            timestamp,
            channel: self.inner.channel.clone(),
        });

        metrics::record_emitted(level.signal());

        self.inner.observers.emit(&LoggerEvent::Log(record.clone()));
        self.inner.provider.observers.emit(&ProviderEvent::Log(record));
    }

    pub fn error<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.log(&LogLevel::ERROR, args)
    }

    pub fn warn<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.log(&LogLevel::WARN, args)
    }

    pub fn info<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.log(&LogLevel::INFO, args)
    }

    pub fn debug<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.log(&LogLevel::DEBUG, args)
    }

    pub fn verbose<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.log(&LogLevel::VERBOSE, args)
    }

    /// Listen to every event this logger emits.
    pub fn subscribe(&self, listener: Listener<LoggerEvent>) -> ListenerId {
        self.inner.observers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl LoggingTarget for Logger {
    fn id(&self) -> Uuid {
        self.inner.id
    }

    fn subscribe_log(&self, listener: LogListener) -> ListenerId {
        self.subscribe(Arc::new(move |event: &LoggerEvent| match event {
            LoggerEvent::Log(record) => listener(record),
        }))
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.observers.unsubscribe(id)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.inner.id)
            .field("channel", &self.inner.channel)
            .field("provider", &self.inner.provider.id)
            .finish()
    }
}
