//! Filesystem capability used by the file sink.

use std::io;
use std::path::Path;

use futures_util::future::BoxFuture;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// The two filesystem operations the file sink needs.
pub trait LogFs: Send + Sync {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    fn ensure_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<()>>;

    /// Append `bytes` to `path`, creating the file if needed.
    fn append<'a>(&'a self, path: &'a Path, bytes: &'a [u8]) -> BoxFuture<'a, io::Result<()>>;
}

/// `LogFs` backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

impl LogFs for TokioFs {
    fn ensure_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<()>> {
        Box::pin(fs::create_dir_all(path))
    }

    fn append<'a>(&'a self, path: &'a Path, bytes: &'a [u8]) -> BoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
            file.write_all(bytes).await?;
            file.flush().await
        })
    }
}
