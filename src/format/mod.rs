//! Formatting pipeline.
//!
//! # Data Flow
//! ```text
//! LogArg (each call argument)
//!     → entry.rs (entry_format: one string per argument)
//!     → line.rs (line_format: time, level, channel, messages → one line)
//!     → LogRecord.line
//! ```
//!
//! # Design Decisions
//! - Arguments are a closed tagged union, resolved by exhaustive matching
//! - Formatters are plain `Fn` values so providers can swap either stage
//! - Formatting cannot fail; unserializable values degrade to a placeholder

pub mod entry;
pub mod line;

use std::fmt;
use std::sync::Arc;

pub use entry::{entry_format, Aggregate, ArgValue, Failure, LogArg};
pub use line::{json_line_format, line_format, LineParts};

/// Renders one call argument.
pub type EntryFormatter = Arc<dyn Fn(LogArg) -> String + Send + Sync>;

/// Renders a whole line from its parts.
pub type LineFormatter = Arc<dyn Fn(&LineParts<'_>) -> String + Send + Sync>;

/// Optional overrides for a provider's formatting stages.
#[derive(Clone, Default)]
pub struct ProviderOptions {
    pub entry_format: Option<EntryFormatter>,
    pub line_format: Option<LineFormatter>,
}

impl ProviderOptions {
    pub fn entry_format<F>(mut self, f: F) -> Self
    where
        F: Fn(LogArg) -> String + Send + Sync + 'static,
    {
        self.entry_format = Some(Arc::new(f));
        self
    }

    pub fn line_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&LineParts<'_>) -> String + Send + Sync + 'static,
    {
        self.line_format = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("entry_format", &self.entry_format.is_some())
            .field("line_format", &self.line_format.is_some())
            .finish()
    }
}

/// The resolved formatting stages a provider hands to its loggers.
#[derive(Clone)]
pub struct Formatting {
    pub entry_format: EntryFormatter,
    pub line_format: LineFormatter,
}

impl Formatting {
    /// Return a copy with every override in `options` applied.
    pub fn apply(self, options: ProviderOptions) -> Formatting {
        Formatting {
            entry_format: options.entry_format.unwrap_or(self.entry_format),
            line_format: options.line_format.unwrap_or(self.line_format),
        }
    }

    pub fn format_entry(&self, arg: LogArg) -> String {
        (self.entry_format)(arg)
    }

    pub fn format_line(&self, parts: &LineParts<'_>) -> String {
        (self.line_format)(parts)
    }
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            entry_format: Arc::new(entry_format),
            line_format: Arc::new(|parts: &LineParts<'_>| line_format(parts)),
        }
    }
}

impl fmt::Debug for Formatting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatting").finish_non_exhaustive()
    }
}
