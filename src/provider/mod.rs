//! Logger factories.
//!
//! # Responsibilities
//! - Create loggers bound to one formatting configuration
//! - Aggregate every child logger's records onto one event stream
//! - Hold the optional process-wide default instance
//!
//! # Design Decisions
//! - Providers are explicit values; independent providers share nothing
//! - Formatting is swapped atomically and read by loggers on each call,
//!   so reconfiguration is live for loggers created earlier
//! - Bubbling to the provider is unconditional; filtering belongs to sinks

pub mod global;

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Utc;
use uuid::Uuid;

use crate::event::{Listener, ListenerId, LogListener, LoggerCreated, LoggingTarget, ObserverList, ProviderEvent};
use crate::format::Formatting;
use crate::logger::Logger;

pub use crate::format::ProviderOptions;

/// State shared between a provider and the loggers it created.
pub(crate) struct ProviderShared {
    pub(crate) id: Uuid,
    pub(crate) formatting: ArcSwap<Formatting>,
    pub(crate) observers: ObserverList<ProviderEvent>,
}

/// Factory for loggers and the aggregate stream of their records.
#[derive(Clone)]
pub struct Provider {
    shared: Arc<ProviderShared>,
}

impl Provider {
    pub fn new(options: ProviderOptions) -> Self {
        Self {
            shared: Arc::new(ProviderShared {
                id: Uuid::new_v4(),
                formatting: ArcSwap::from_pointee(Formatting::default().apply(options)),
                observers: ObserverList::new(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Create a logger and announce it with [`ProviderEvent::LoggerCreated`].
    pub fn create_logger(&self, channel: Option<&str>) -> Logger {
        let channel = channel.map(str::to_string);
        let logger = Logger::new(self.shared.clone(), channel.clone());

        tracing::trace!(provider = %self.shared.id, logger = %logger.id(), channel = ?channel, "Logger created");

        self.shared.observers.emit(&ProviderEvent::LoggerCreated(LoggerCreated {
            id: Uuid::new_v4(),
            logger: logger.clone(),
            channel,
            time: Utc::now(),
        }));

        logger
    }

    /// Apply `options` on top of the current formatting.
    ///
    /// Takes effect on the next call of every logger from this provider.
    pub fn reconfigure(&self, options: ProviderOptions) {
        let current = Formatting::clone(&self.shared.formatting.load());
        self.shared.formatting.store(Arc::new(current.apply(options)));
    }

    /// Snapshot of the formatting currently in effect.
    pub fn formatting(&self) -> Formatting {
        Formatting::clone(&self.shared.formatting.load())
    }

    /// Listen to every event this provider emits.
    pub fn subscribe(&self, listener: Listener<ProviderEvent>) -> ListenerId {
        self.shared.observers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.observers.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.shared.observers.len()
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new(ProviderOptions::default())
    }
}

impl LoggingTarget for Provider {
    fn id(&self) -> Uuid {
        self.shared.id
    }

    fn subscribe_log(&self, listener: LogListener) -> ListenerId {
        self.subscribe(Arc::new(move |event: &ProviderEvent| {
            if let ProviderEvent::Log(record) = event {
                listener(record);
            }
        }))
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.observers.unsubscribe(id)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.shared.id)
            .field("listeners", &self.shared.observers.len())
            .finish()
    }
}
