//! Error types shared across sinks and the default provider.

use std::io;
use std::path::PathBuf;

/// Failure raised by a sink while performing its output side effect.
///
/// Dispatch never surfaces these to the caller of `Logger::log`; they reach
/// code that awaits the sink itself (`write_record`, `flush`, shutdown drain).
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{op} failed for {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("console write failed: {0}")]
    Console(#[source] io::Error),

    #[error("file sink requires a running tokio runtime")]
    NoRuntime,

    #[error("write queue closed")]
    Closed,

    #[error("{} sink operations failed (first: {})", .0.len(), first_message(.0))]
    Batch(Vec<SinkError>),
}

fn first_message(errors: &[SinkError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

impl SinkError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SinkError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Collapse a list of failures into a single error, if any.
    pub fn from_failures(mut failures: Vec<SinkError>) -> Option<SinkError> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(SinkError::Batch(failures)),
        }
    }
}

/// Error returned when installing the process-wide default provider.
#[derive(Debug, thiserror::Error)]
pub enum GlobalError {
    #[error("a default provider is already installed")]
    AlreadyInstalled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_failures() {
        assert!(SinkError::from_failures(Vec::new()).is_none());

        let single = SinkError::from_failures(vec![SinkError::Closed]).unwrap();
        assert!(matches!(single, SinkError::Closed));

        let batch = SinkError::from_failures(vec![SinkError::Closed, SinkError::NoRuntime]).unwrap();
        assert!(batch.to_string().starts_with("2 sink operations failed"));
    }
}
