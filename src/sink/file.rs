//! File sink.
//!
//! # Responsibilities
//! - Resolve a directory and file name for each allowed record
//! - Create the directory on demand and append the record's line
//! - Keep writes from one target in emission order
//!
//! # Design Decisions
//! - One unbounded queue and worker task per attached target, released with
//!   the target's listener
//! - Write failures are collected and surfaced by `flush`
//! - No handle caching; every append opens the file

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use crate::error::SinkError;
use crate::event::LoggingTarget;
use crate::level::LogLevel;
use crate::logger::LogRecord;
use crate::observability::metrics;
use crate::sink::{LevelFilter, LogFs, Sink, SinkAdapter, SinkCallback, TokioFs};

/// What a path resolver gets to decide where a record goes.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// The target the sink is attached to (a logger or a provider).
    pub id: Uuid,
    pub logger_id: Uuid,
    pub level: LogLevel,
    pub time: DateTime<Utc>,
    pub channel: Option<String>,
}

impl PathContext {
    fn new(target_id: Uuid, record: &LogRecord) -> Self {
        Self {
            id: target_id,
            logger_id: record.logger_id,
            level: record.level.clone(),
            time: record.timestamp,
            channel: record.channel.clone(),
        }
    }
}

type SyncResolver = Arc<dyn Fn(&PathContext) -> PathBuf + Send + Sync>;
type AsyncResolver = Arc<dyn Fn(PathContext) -> BoxFuture<'static, PathBuf> + Send + Sync>;

/// A path given literally or computed per record.
#[derive(Clone)]
pub enum PathResolver {
    Literal(PathBuf),
    Sync(SyncResolver),
    Async(AsyncResolver),
}

impl PathResolver {
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&PathContext) -> PathBuf + Send + Sync + 'static,
    {
        PathResolver::Sync(Arc::new(f))
    }

    pub fn with_async<F, Fut>(f: F) -> Self
    where
        F: Fn(PathContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PathBuf> + Send + 'static,
    {
        PathResolver::Async(Arc::new(move |ctx: PathContext| -> BoxFuture<'static, PathBuf> {
            Box::pin(f(ctx))
        }))
    }

    pub async fn resolve(&self, ctx: &PathContext) -> PathBuf {
        match self {
            PathResolver::Literal(path) => path.clone(),
            PathResolver::Sync(resolve) => resolve(ctx),
            PathResolver::Async(resolve) => resolve(ctx.clone()).await,
        }
    }
}

impl From<&str> for PathResolver {
    fn from(path: &str) -> Self {
        PathResolver::Literal(PathBuf::from(path))
    }
}

impl From<String> for PathResolver {
    fn from(path: String) -> Self {
        PathResolver::Literal(PathBuf::from(path))
    }
}

impl From<&Path> for PathResolver {
    fn from(path: &Path) -> Self {
        PathResolver::Literal(path.to_path_buf())
    }
}

impl From<PathBuf> for PathResolver {
    fn from(path: PathBuf) -> Self {
        PathResolver::Literal(path)
    }
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathResolver::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            PathResolver::Sync(_) => f.write_str("Sync(..)"),
            PathResolver::Async(_) => f.write_str("Async(..)"),
        }
    }
}

/// `YYYY-MM-DD.log`, by the record's UTC date.
pub fn default_file_name(ctx: &PathContext) -> PathBuf {
    PathBuf::from(format!("{}.log", ctx.time.format("%Y-%m-%d")))
}

#[derive(Debug, Clone)]
pub struct FileOptions {
    /// Allowed level signals; `None` allows all.
    pub log_levels: Option<Vec<String>>,
    pub log_dir: PathResolver,
    /// Defaults to [`default_file_name`].
    pub file_name: Option<PathResolver>,
}

impl FileOptions {
    pub fn new(log_dir: impl Into<PathResolver>) -> Self {
        Self {
            log_levels: None,
            log_dir: log_dir.into(),
            file_name: None,
        }
    }

    pub fn log_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn file_name(mut self, file_name: impl Into<PathResolver>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

struct FileState {
    filter: LevelFilter,
    log_dir: PathResolver,
    file_name: Option<PathResolver>,
    fs: Arc<dyn LogFs>,
    failures: Mutex<Vec<SinkError>>,
}

impl FileState {
    async fn append(&self, target_id: Uuid, record: &LogRecord) -> Result<PathBuf, SinkError> {
        let ctx = PathContext::new(target_id, record);
        let dir = self.log_dir.resolve(&ctx).await;
        let name = match &self.file_name {
            Some(resolver) => resolver.resolve(&ctx).await,
            None => default_file_name(&ctx),
        };

        self.fs
            .ensure_dir(&dir)
            .await
            .map_err(|e| SinkError::io("create log directory", &dir, e))?;

        let path = dir.join(name);
        let mut bytes = Vec::with_capacity(record.line.len() + 1);
        bytes.extend_from_slice(record.line.as_bytes());
        bytes.push(b'\n');

        self.fs
            .append(&path, &bytes)
            .await
            .map_err(|e| SinkError::io("append", &path, e))?;

        metrics::record_sink_write("file");
        Ok(path)
    }

    fn record_failure(&self, target_id: Uuid, error: SinkError) {
        metrics::record_sink_failure("file");
        tracing::error!(target = %target_id, error = %error, "File sink write failed");
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }
}

enum Job {
    Write(Arc<LogRecord>),
    Flush(oneshot::Sender<()>),
}

/// Sending half of a target's write queue.
///
/// The strong handle lives in the target's listener; once it is gone the
/// worker drains what is left and exits.
struct WriteQueue {
    tx: mpsc::UnboundedSender<Job>,
}

struct Slot {
    queue: Weak<WriteQueue>,
    /// Closed when the worker exits.
    done: watch::Receiver<()>,
}

impl Slot {
    fn is_finished(&self) -> bool {
        self.queue.strong_count() == 0 && self.done.has_changed().is_err()
    }
}

/// One write queue per target id. A re-attached target gets a new queue whose
/// worker waits for the previous one, so its lines stay in emission order.
struct Queues {
    runtime: Handle,
    slots: DashMap<Uuid, Slot>,
}

impl Queues {
    /// The target's live queue, or a new one chained after any still draining.
    fn open(&self, state: &Arc<FileState>, target_id: Uuid) -> Arc<WriteQueue> {
        self.prune();
        match self.slots.entry(target_id) {
            Entry::Occupied(mut slot) => {
                if let Some(queue) = slot.get().queue.upgrade() {
                    return queue;
                }
                let previous = slot.get().done.clone();
                let (queue, next) = self.spawn(state, target_id, Some(previous));
                slot.insert(next);
                queue
            }
            Entry::Vacant(slot) => {
                let (queue, next) = self.spawn(state, target_id, None);
                slot.insert(next);
                queue
            }
        }
    }

    fn spawn(
        &self,
        state: &Arc<FileState>,
        target_id: Uuid,
        previous: Option<watch::Receiver<()>>,
    ) -> (Arc<WriteQueue>, Slot) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done) = watch::channel(());
        self.runtime.spawn(run_queue(state.clone(), target_id, rx, previous, done_tx));
        tracing::debug!(target = %target_id, "File sink queue started");

        let queue = Arc::new(WriteQueue { tx });
        let slot = Slot {
            queue: Arc::downgrade(&queue),
            done,
        };
        (queue, slot)
    }

    fn enqueue(&self, target_id: Uuid, record: &Arc<LogRecord>) -> Result<(), SinkError> {
        let queue = self
            .slots
            .get(&target_id)
            .and_then(|slot| slot.queue.upgrade())
            .ok_or(SinkError::Closed)?;

        queue
            .tx
            .send(Job::Write(record.clone()))
            .map_err(|_| SinkError::Closed)
    }

    /// Live queues, and the exit signals of workers still draining.
    fn snapshot(&self) -> (Vec<Arc<WriteQueue>>, Vec<watch::Receiver<()>>) {
        let mut live = Vec::new();
        let mut draining = Vec::new();
        for slot in self.slots.iter() {
            match slot.queue.upgrade() {
                Some(queue) => live.push(queue),
                None => draining.push(slot.done.clone()),
            }
        }
        (live, draining)
    }

    fn prune(&self) {
        self.slots.retain(|_, slot| !slot.is_finished());
    }
}

async fn finished(mut done: watch::Receiver<()>) {
    while done.changed().await.is_ok() {}
}

async fn run_queue(
    state: Arc<FileState>,
    target_id: Uuid,
    mut rx: mpsc::UnboundedReceiver<Job>,
    previous: Option<watch::Receiver<()>>,
    _done: watch::Sender<()>,
) {
    if let Some(previous) = previous {
        finished(previous).await;
    }

    while let Some(job) = rx.recv().await {
        match job {
            Job::Write(record) => {
                if let Err(e) = state.append(target_id, &record).await {
                    state.record_failure(target_id, e);
                }
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!(target = %target_id, "File sink queue closed");
}

/// Appends each allowed record's line to a resolved file.
pub struct FileSink {
    state: Arc<FileState>,
    queues: Arc<Queues>,
    adapter: SinkAdapter,
}

impl FileSink {
    /// Must be called from within a tokio runtime.
    pub fn new(options: FileOptions) -> Result<Self, SinkError> {
        Self::with_fs(options, Arc::new(TokioFs))
    }

    pub fn with_fs(options: FileOptions, fs: Arc<dyn LogFs>) -> Result<Self, SinkError> {
        let runtime = Handle::try_current().map_err(|_| SinkError::NoRuntime)?;

        let state = Arc::new(FileState {
            filter: LevelFilter::new(options.log_levels),
            log_dir: options.log_dir,
            file_name: options.file_name,
            fs,
            failures: Mutex::new(Vec::new()),
        });
        let queues = Arc::new(Queues {
            runtime,
            slots: DashMap::new(),
        });

        let callback_state = state.clone();
        let callback_queues = queues.clone();
        let adapter = SinkAdapter::new(
            "file",
            Box::new(move |target_id: Uuid, record: &Arc<LogRecord>| {
                if !callback_state.filter.allows(&record.level) {
                    return Ok(());
                }
                callback_queues.enqueue(target_id, record)
            }) as SinkCallback,
        );

        Ok(Self { state, queues, adapter })
    }

    /// Resolve and append one record now, bypassing the queues.
    ///
    /// Returns the written path, or `None` if the level is filtered out.
    pub async fn write_record(&self, target_id: Uuid, record: &LogRecord) -> Result<Option<PathBuf>, SinkError> {
        if !self.state.filter.allows(&record.level) {
            return Ok(None);
        }
        self.state.append(target_id, record).await.map(Some)
    }

    /// Wait for every queued write, then report failures since the last flush.
    ///
    /// Queues of detached or dropped targets are awaited and released.
    pub async fn flush(&self) -> Result<(), SinkError> {
        let (live, draining) = self.queues.snapshot();

        let pending: Vec<oneshot::Receiver<()>> = live
            .iter()
            .filter_map(|queue| {
                let (tx, rx) = oneshot::channel();
                queue.tx.send(Job::Flush(tx)).ok().map(|_| rx)
            })
            .collect();
        drop(live);

        for done in pending {
            let _ = done.await;
        }
        for done in draining {
            finished(done).await;
        }
        self.queues.prune();

        let failures = std::mem::take(&mut *self.state.failures.lock().unwrap_or_else(PoisonError::into_inner));
        match SinkError::from_failures(failures) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Targets with a live or still-draining write queue.
    pub fn queue_count(&self) -> usize {
        self.queues.slots.len()
    }

    /// For inspection. Attach with [`Sink::on`], which also opens the target's queue.
    pub fn adapter(&self) -> &SinkAdapter {
        &self.adapter
    }
}

impl Sink for FileSink {
    fn on(&self, target: &dyn LoggingTarget) {
        let queue = self.queues.open(&self.state, target.id());
        self.adapter.on_with(target, queue);
    }

    /// Pending writes still land; the next `flush` waits for them.
    fn off(&self, target: &dyn LoggingTarget) {
        self.adapter.off(target);
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("filter", &self.state.filter)
            .field("log_dir", &self.state.log_dir)
            .field("file_name", &self.state.file_name)
            .field("queues", &self.queues.slots.len())
            .finish()
    }
}
