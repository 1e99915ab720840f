//! Shutdown coordination: flush pending sink writes before exit.

use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::BoxFuture;
use tokio::sync::broadcast;

use crate::error::SinkError;
use crate::sink::FileSink;

/// Something holding pending output that must be flushed before exit.
pub trait Drain: Send + Sync {
    fn drain(&self) -> BoxFuture<'_, Result<(), SinkError>>;
}

impl Drain for FileSink {
    fn drain(&self) -> BoxFuture<'_, Result<(), SinkError>> {
        Box::pin(self.flush())
    }
}

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe to the broadcast; sinks with pending
/// output register a [`Drain`] hook.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
    hooks: Mutex<Vec<(String, Arc<dyn Drain>)>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            hooks: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Register a hook to run during [`Shutdown::drain`].
    pub fn on_shutdown(&self, name: impl Into<String>, hook: Arc<dyn Drain>) {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.into(), hook));
    }

    /// Trigger the shutdown signal without draining.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Signal shutdown, then run every hook in registration order.
    ///
    /// All hooks run even if some fail; failures are returned together.
    pub async fn drain(&self) -> Result<(), SinkError> {
        self.trigger();

        let hooks: Vec<(String, Arc<dyn Drain>)> = self
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut failures = Vec::new();
        for (name, hook) in hooks {
            match hook.drain().await {
                Ok(()) => tracing::debug!(hook = %name, "Drained"),
                Err(e) => {
                    tracing::error!(hook = %name, error = %e, "Drain failed");
                    failures.push(e);
                }
            }
        }

        match SinkError::from_failures(failures) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
