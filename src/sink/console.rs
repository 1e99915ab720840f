//! Console sink.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SinkError;
use crate::event::LoggingTarget;
use crate::level::{LogLevel, Tint, TintColor};
use crate::logger::LogRecord;
use crate::observability::metrics;
use crate::sink::{LevelFilter, Sink, SinkAdapter, SinkCallback};

/// Standard stream a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Destination for console lines.
pub trait ConsoleOutput: Send + Sync {
    fn write_line(&self, stream: Stream, line: &str) -> io::Result<()>;

    fn is_terminal(&self, stream: Stream) -> bool;
}

/// The process's standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl ConsoleOutput for StdConsole {
    fn write_line(&self, stream: Stream, line: &str) -> io::Result<()> {
        match stream {
            Stream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            Stream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        }
    }

    fn is_terminal(&self, stream: Stream) -> bool {
        match stream {
            Stream::Stdout => io::stdout().is_terminal(),
            Stream::Stderr => io::stderr().is_terminal(),
        }
    }
}

/// When to apply a level's tint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TintMode {
    /// Only when the stream is an interactive terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Overrides the tint chosen for a level.
pub type TintResolver = Arc<dyn Fn(&LogLevel) -> Option<Tint> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ConsoleOptions {
    /// Allowed level signals; `None` allows all.
    pub log_levels: Option<Vec<String>>,
    pub tint: TintMode,
    /// Route records at ERROR severity or above to stderr.
    pub errors_to_stderr: bool,
    pub tint_resolver: Option<TintResolver>,
}

impl ConsoleOptions {
    pub fn log_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn tint(mut self, mode: TintMode) -> Self {
        self.tint = mode;
        self
    }

    pub fn errors_to_stderr(mut self, enabled: bool) -> Self {
        self.errors_to_stderr = enabled;
        self
    }

    pub fn tint_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&LogLevel) -> Option<Tint> + Send + Sync + 'static,
    {
        self.tint_resolver = Some(Arc::new(resolver));
        self
    }
}

impl fmt::Debug for ConsoleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleOptions")
            .field("log_levels", &self.log_levels)
            .field("tint", &self.tint)
            .field("errors_to_stderr", &self.errors_to_stderr)
            .field("tint_resolver", &self.tint_resolver.is_some())
            .finish()
    }
}

struct ConsoleState {
    filter: LevelFilter,
    tint: TintMode,
    errors_to_stderr: bool,
    tint_resolver: Option<TintResolver>,
    output: Arc<dyn ConsoleOutput>,
}

impl ConsoleState {
    fn write_record(&self, record: &LogRecord) -> Result<(), SinkError> {
        if !self.filter.allows(&record.level) {
            return Ok(());
        }

        let stream = if self.errors_to_stderr && record.level.severity >= LogLevel::ERROR.severity {
            Stream::Stderr
        } else {
            Stream::Stdout
        };

        let colorize = match self.tint {
            TintMode::Always => true,
            TintMode::Never => false,
            TintMode::Auto => self.output.is_terminal(stream),
        };
        let hint = match &self.tint_resolver {
            Some(resolve) => resolve(&record.level),
            None => record.level.display_hint,
        };

        let text = match hint {
            Some(hint) if colorize => apply_tint(&record.line, hint),
            _ => record.line.clone(),
        };

        self.output.write_line(stream, &text).map_err(SinkError::Console)?;
        metrics::record_sink_write("console");
        Ok(())
    }
}

fn apply_tint(text: &str, tint: Tint) -> String {
    let color = match tint.color {
        TintColor::Red => Color::Red,
        TintColor::Green => Color::Green,
        TintColor::Yellow => Color::Yellow,
        TintColor::Blue => Color::Blue,
        TintColor::Magenta => Color::Magenta,
        TintColor::Cyan => Color::Cyan,
        TintColor::White => Color::White,
    };
    let colored = text.color(color);
    if tint.bold {
        colored.bold().to_string()
    } else {
        colored.to_string()
    }
}

/// Writes each allowed record's line to the console.
pub struct ConsoleSink {
    state: Arc<ConsoleState>,
    adapter: SinkAdapter,
}

impl ConsoleSink {
    pub fn new(options: ConsoleOptions) -> Self {
        Self::with_output(options, Arc::new(StdConsole))
    }

    pub fn with_output(options: ConsoleOptions, output: Arc<dyn ConsoleOutput>) -> Self {
        let state = Arc::new(ConsoleState {
            filter: LevelFilter::new(options.log_levels),
            tint: options.tint,
            errors_to_stderr: options.errors_to_stderr,
            tint_resolver: options.tint_resolver,
            output,
        });

        let callback_state = state.clone();
        let adapter = SinkAdapter::new(
            "console",
            Box::new(move |_: Uuid, record: &Arc<LogRecord>| callback_state.write_record(record)) as SinkCallback,
        );

        Self { state, adapter }
    }

    /// Write one record directly, bypassing subscriptions.
    pub fn write_record(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.state.write_record(record)
    }

    pub fn adapter(&self) -> &SinkAdapter {
        &self.adapter
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(ConsoleOptions::default())
    }
}

impl Sink for ConsoleSink {
    fn on(&self, target: &dyn LoggingTarget) {
        self.adapter.on(target)
    }

    fn off(&self, target: &dyn LoggingTarget) {
        self.adapter.off(target);
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("filter", &self.state.filter)
            .field("tint", &self.state.tint)
            .field("targets", &self.adapter.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        lines: Mutex<Vec<(Stream, String)>>,
        terminal: bool,
    }

    impl ConsoleOutput for Capture {
        fn write_line(&self, stream: Stream, line: &str) -> io::Result<()> {
            self.lines.lock().unwrap().push((stream, line.to_string()));
            Ok(())
        }

        fn is_terminal(&self, _: Stream) -> bool {
            self.terminal
        }
    }

    struct Broken;

    impl ConsoleOutput for Broken {
        fn write_line(&self, _: Stream, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn is_terminal(&self, _: Stream) -> bool {
            false
        }
    }

    #[test]
    fn test_allow_list_filters_by_signal() {
        let capture = Arc::new(Capture::default());
        let sink = ConsoleSink::with_output(ConsoleOptions::default().log_levels(["warn"]), capture.clone());
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        sink.on(&logger);

        logger.info(["hidden"]);
        logger.warn(["shown"]);

        let lines = capture.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].1.ends_with("|WARN| shown"));
    }

    #[test]
    fn test_no_tint_when_not_a_terminal() {
        let capture = Arc::new(Capture::default());
        let sink = ConsoleSink::with_output(ConsoleOptions::default(), capture.clone());
        let provider = Provider::default();
        let logger = provider.create_logger(Some("Main"));
        sink.on(&provider);

        logger.error(["plain"]);

        let lines = capture.lines.lock().unwrap();
        assert!(lines[0].1.starts_with('|'));
        assert!(lines[0].1.ends_with("|ERROR|[Main] plain"));
        assert_eq!(lines[0].0, Stream::Stdout);
    }

    #[test]
    fn test_tinted_line_keeps_text() {
        let capture = Arc::new(Capture {
            terminal: true,
            ..Default::default()
        });
        let sink = ConsoleSink::with_output(ConsoleOptions::default(), capture.clone());
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        sink.on(&logger);

        logger.info(["tinted"]);
        logger.verbose(["untinted"]);

        let lines = capture.lines.lock().unwrap();
        assert!(lines[0].1.contains("|INFO| tinted"));
        assert!(lines[1].1.starts_with('|'));
    }

    #[test]
    fn test_errors_routed_to_stderr() {
        let capture = Arc::new(Capture::default());
        let sink = ConsoleSink::with_output(
            ConsoleOptions::default().errors_to_stderr(true).tint(TintMode::Never),
            capture.clone(),
        );
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        sink.on(&logger);

        logger.warn(["w"]);
        logger.error(["e"]);

        let streams: Vec<Stream> = capture.lines.lock().unwrap().iter().map(|(s, _)| *s).collect();
        assert_eq!(streams, [Stream::Stdout, Stream::Stderr]);
    }

    #[test]
    fn test_write_failure_surfaces_on_direct_write() {
        let sink = ConsoleSink::with_output(ConsoleOptions::default(), Arc::new(Broken));
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        sink.on(&logger);

        // Dispatch swallows the failure; the direct call reports it.
        logger.info(["dropped"]);

        let records = Arc::new(Mutex::new(Vec::new()));
        let keep = records.clone();
        provider.subscribe_log(Arc::new(move |record: &Arc<LogRecord>| keep.lock().unwrap().push(record.clone())));
        logger.info(["again"]);

        let record = records.lock().unwrap()[0].clone();
        assert!(matches!(sink.write_record(&record), Err(SinkError::Console(_))));
    }
}
