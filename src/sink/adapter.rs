//! On/off subscription primitive shared by every sink.

use std::fmt;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::SinkError;
use crate::event::{ListenerId, LoggingTarget};
use crate::logger::LogRecord;
use crate::observability::metrics;
use crate::sink::Sink;

/// Boxed sink callback, the default adapter parameter.
pub type SinkCallback = Box<dyn Fn(Uuid, &Arc<LogRecord>) -> Result<(), SinkError> + Send + Sync>;

/// Attaches one callback to any number of targets, at most once per target.
///
/// The callback receives the id of the target the record came from. Its
/// errors never reach the emitting `log` call; they are reported through
/// tracing and the sink failure counter.
///
/// An attachment lives as long as the listener registered on the target, so
/// dropping a logger without calling `off` releases it too.
pub struct SinkAdapter<F = SinkCallback> {
    name: &'static str,
    on_logged: Arc<F>,
    /// target id -> listener registered on that target
    listeners: DashMap<Uuid, Attachment>,
}

struct Attachment {
    listener: ListenerId,
    /// Dead once the target has dropped the listener.
    alive: Weak<()>,
}

impl Attachment {
    fn is_alive(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

impl<F> SinkAdapter<F>
where
    F: Fn(Uuid, &Arc<LogRecord>) -> Result<(), SinkError> + Send + Sync + 'static,
{
    /// `name` labels diagnostics and metrics for this sink.
    pub fn new(name: &'static str, on_logged: F) -> Self {
        Self {
            name,
            on_logged: Arc::new(on_logged),
            listeners: DashMap::new(),
        }
    }

    /// Start forwarding `target`'s records, replacing any earlier registration.
    pub fn on(&self, target: &dyn LoggingTarget) {
        self.on_with(target, ());
    }

    /// Like [`SinkAdapter::on`], holding `guard` until this attachment ends:
    /// on `off`, on re-attachment, or when the target itself is dropped.
    pub fn on_with<G>(&self, target: &dyn LoggingTarget, guard: G)
    where
        G: Send + Sync + 'static,
    {
        self.prune();

        let target_id = target.id();
        if let Some((_, previous)) = self.listeners.remove(&target_id) {
            target.unsubscribe(previous.listener);
        }

        let token = Arc::new(());
        let alive = Arc::downgrade(&token);
        let held = (token, guard);
        let on_logged = self.on_logged.clone();
        let name = self.name;
        let listener = target.subscribe_log(Arc::new(move |record: &Arc<LogRecord>| {
            let _held = &held;
            if let Err(e) = on_logged(target_id, record) {
                metrics::record_sink_failure(name);
                tracing::error!(sink = name, target = %target_id, record = %record.id, error = %e, "Sink failed to handle record");
            }
        }));

        self.listeners.insert(target_id, Attachment { listener, alive });
        tracing::debug!(sink = name, target = %target_id, "Sink attached");
    }

    /// Stop forwarding `target`'s records. Returns `false` if it was not attached.
    pub fn off(&self, target: &dyn LoggingTarget) -> bool {
        match self.listeners.remove(&target.id()) {
            Some((target_id, attachment)) => {
                target.unsubscribe(attachment.listener);
                tracing::debug!(sink = self.name, target = %target_id, "Sink detached");
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self, target: &dyn LoggingTarget) -> bool {
        self.listeners
            .get(&target.id())
            .is_some_and(|attachment| attachment.is_alive())
    }

    /// Number of targets currently attached.
    pub fn len(&self) -> usize {
        self.prune();
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Forget attachments whose target is gone.
    fn prune(&self) {
        self.listeners.retain(|target_id, attachment| {
            let alive = attachment.is_alive();
            if !alive {
                tracing::trace!(sink = self.name, target = %target_id, "Target dropped; attachment released");
            }
            alive
        });
    }
}

impl<F> Sink for SinkAdapter<F>
where
    F: Fn(Uuid, &Arc<LogRecord>) -> Result<(), SinkError> + Send + Sync + 'static,
{
    fn on(&self, target: &dyn LoggingTarget) {
        SinkAdapter::on(self, target)
    }

    fn off(&self, target: &dyn LoggingTarget) {
        SinkAdapter::off(self, target);
    }
}

impl<F> fmt::Debug for SinkAdapter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkAdapter")
            .field("name", &self.name)
            .field("targets", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_adapter() -> (SinkAdapter<SinkCallback>, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let adapter = SinkAdapter::new(
            "test",
            Box::new(move |_: Uuid, _: &Arc<LogRecord>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }) as SinkCallback,
        );
        (adapter, hits)
    }

    #[test]
    fn test_on_then_off_leaves_no_subscription() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let (adapter, hits) = counting_adapter();

        adapter.on(&logger);
        assert!(adapter.off(&logger));
        logger.info(["x"]);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(adapter.is_empty());
        assert_eq!(logger.listener_count(), 0);
    }

    #[test]
    fn test_reregistering_replaces() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let (adapter, hits) = counting_adapter();

        adapter.on(&logger);
        adapter.on(&logger);
        logger.info(["x"]);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.len(), 1);
        assert_eq!(logger.listener_count(), 1);
    }

    #[test]
    fn test_off_unknown_target_is_noop() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let (adapter, _) = counting_adapter();

        assert!(!adapter.off(&logger));
        assert!(!adapter.off(&provider));
    }

    #[test]
    fn test_many_targets_are_independent() {
        let provider = Provider::default();
        let a = provider.create_logger(Some("A"));
        let b = provider.create_logger(Some("B"));
        let (adapter, hits) = counting_adapter();

        adapter.on(&a);
        adapter.on(&b);
        adapter.on(&provider);
        assert!(adapter.is_attached(&a));

        a.info(["1"]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        adapter.off(&a);
        a.info(["2"]);
        b.info(["3"]);
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_callback_receives_target_id() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let adapter = SinkAdapter::new("ids", move |target: Uuid, _: &Arc<LogRecord>| {
            sink.lock().unwrap().push(target);
            Ok(())
        });

        adapter.on(&logger);
        adapter.on(&provider);
        logger.info(["x"]);

        assert_eq!(*seen.lock().unwrap(), [logger.id(), provider.id()]);
    }

    #[test]
    fn test_dropped_target_releases_attachment() {
        let provider = Provider::default();
        let (adapter, hits) = counting_adapter();
        let guard = Arc::new(());

        for _ in 0..20 {
            let logger = provider.create_logger(None);
            adapter.on_with(&logger, guard.clone());
            logger.info(["x"]);
        }

        assert_eq!(hits.load(Ordering::SeqCst), 20);
        assert_eq!(adapter.len(), 0);
        assert_eq!(Arc::strong_count(&guard), 1);
    }

    #[test]
    fn test_guard_released_on_off_and_replace() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let (adapter, _) = counting_adapter();
        let first = Arc::new(());
        let second = Arc::new(());

        adapter.on_with(&logger, first.clone());
        adapter.on_with(&logger, second.clone());
        assert_eq!(Arc::strong_count(&first), 1);
        assert_eq!(Arc::strong_count(&second), 2);

        adapter.off(&logger);
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[test]
    fn test_callback_error_does_not_reach_caller() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let adapter = SinkAdapter::new("broken", |_: Uuid, _: &Arc<LogRecord>| Err(SinkError::Closed));

        adapter.on(&logger);
        logger.error(["still fine"]);
    }
}
