//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use logbus::sink::{ConsoleOutput, LogFs, SinkAdapter, Stream};
use logbus::{LogRecord, SinkError};
use uuid::Uuid;

/// Console output that keeps every line in memory.
#[derive(Default)]
pub struct CaptureConsole {
    lines: Mutex<Vec<(Stream, String)>>,
}

impl CaptureConsole {
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn text(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, line)| line).collect()
    }
}

impl ConsoleOutput for CaptureConsole {
    fn write_line(&self, stream: Stream, line: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push((stream, line.to_string()));
        Ok(())
    }

    fn is_terminal(&self, _stream: Stream) -> bool {
        false
    }
}

/// In-memory filesystem. Paths under `fail_under` reject appends; `delay`
/// slows every append down.
#[derive(Default)]
pub struct MemoryFs {
    pub dirs: Mutex<Vec<PathBuf>>,
    pub files: Mutex<HashMap<PathBuf, String>>,
    pub fail_under: Option<PathBuf>,
    pub delay: Option<Duration>,
}

impl MemoryFs {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn failing_under(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_under: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl LogFs for MemoryFs {
    fn ensure_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            self.dirs.lock().unwrap().push(path.to_path_buf());
            Ok(())
        })
    }

    fn append<'a>(&'a self, path: &'a Path, bytes: &'a [u8]) -> BoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_under.as_deref().is_some_and(|root| path.starts_with(root)) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.files
                .lock()
                .unwrap()
                .entry(path.to_path_buf())
                .or_default()
                .push_str(&String::from_utf8_lossy(bytes));
            Ok(())
        })
    }
}

pub type Received = Arc<Mutex<Vec<(Uuid, Arc<LogRecord>)>>>;

/// Sink adapter that records every delivery with the target it came from.
pub fn recording_sink() -> (
    SinkAdapter<impl Fn(Uuid, &Arc<LogRecord>) -> Result<(), SinkError> + Send + Sync + 'static>,
    Received,
) {
    let received: Received = Arc::default();
    let sink_received = received.clone();
    let adapter = SinkAdapter::new("recording", move |target: Uuid, record: &Arc<LogRecord>| {
        sink_received.lock().unwrap().push((target, record.clone()));
        Ok(())
    });
    (adapter, received)
}
