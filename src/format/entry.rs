//! Per-argument rendering.

use std::error::Error;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// An error-like argument: a message plus an optional trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: String,
    pub trace: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Capture an error's message and its `source()` chain as the trace.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            message: err.to_string(),
            trace: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }

    fn render(&self) -> String {
        format!("{} {}", self.message, self.trace.as_deref().unwrap_or_default())
    }
}

/// An error that wraps several sub-errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub message: String,
    pub trace: Option<String>,
    pub errors: Vec<Failure>,
}

impl Aggregate {
    pub fn new(message: impl Into<String>, errors: Vec<Failure>) -> Self {
        Self {
            message: message.into(),
            trace: None,
            errors,
        }
    }
}

/// Deferred argument; only evaluated when the record is formatted.
pub type Thunk = Box<dyn FnOnce() -> LogArg + Send>;

/// A single argument to a log call.
pub enum LogArg {
    /// Text rendered verbatim.
    Plain(String),
    /// Structured value rendered as compact JSON.
    Value(Value),
    Failure(Failure),
    Lazy(Thunk),
    Aggregate(Aggregate),
}

impl LogArg {
    /// Render any `Debug` value.
    pub fn debug(value: &impl fmt::Debug) -> Self {
        LogArg::Plain(format!("{value:?}"))
    }

    /// Render any `Serialize` value as JSON.
    pub fn json(value: &impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => LogArg::Value(value),
            Err(e) => LogArg::Plain(format!("<unserializable: {e}>")),
        }
    }

    pub fn error(err: &(dyn Error + 'static)) -> Self {
        LogArg::Failure(Failure::from_error(err))
    }

    /// Defer building an argument until the record is produced.
    pub fn lazy<F, T>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
        T: Into<LogArg>,
    {
        LogArg::Lazy(Box::new(move || f().into()))
    }

    /// Run any deferred thunk (once, recursively) and keep the result.
    pub fn resolve(self) -> ArgValue {
        match self {
            LogArg::Plain(text) => ArgValue::Plain(text),
            LogArg::Value(value) => ArgValue::Value(value),
            LogArg::Failure(failure) => ArgValue::Failure(failure),
            LogArg::Lazy(thunk) => thunk().resolve(),
            LogArg::Aggregate(aggregate) => ArgValue::Aggregate(aggregate),
        }
    }
}

/// A call argument after deferred values have run, as kept on the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ArgValue {
    Plain(String),
    Value(Value),
    Failure(Failure),
    Aggregate(Aggregate),
}

impl From<ArgValue> for LogArg {
    fn from(value: ArgValue) -> Self {
        match value {
            ArgValue::Plain(text) => LogArg::Plain(text),
            ArgValue::Value(value) => LogArg::Value(value),
            ArgValue::Failure(failure) => LogArg::Failure(failure),
            ArgValue::Aggregate(aggregate) => LogArg::Aggregate(aggregate),
        }
    }
}

impl fmt::Debug for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Plain(s) => f.debug_tuple("Plain").field(s).finish(),
            LogArg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            LogArg::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
            LogArg::Lazy(_) => f.write_str("Lazy(..)"),
            LogArg::Aggregate(a) => f.debug_tuple("Aggregate").field(a).finish(),
        }
    }
}

impl From<&str> for LogArg {
    fn from(value: &str) -> Self {
        LogArg::Plain(value.to_string())
    }
}

impl From<String> for LogArg {
    fn from(value: String) -> Self {
        LogArg::Plain(value)
    }
}

impl From<&String> for LogArg {
    fn from(value: &String) -> Self {
        LogArg::Plain(value.clone())
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        LogArg::Value(value)
    }
}

impl From<Failure> for LogArg {
    fn from(value: Failure) -> Self {
        LogArg::Failure(value)
    }
}

impl From<Aggregate> for LogArg {
    fn from(value: Aggregate) -> Self {
        LogArg::Aggregate(value)
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg {
                fn from(value: $ty) -> Self {
                    LogArg::Plain(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Default entry formatter.
pub fn entry_format(arg: LogArg) -> String {
    match arg {
        LogArg::Plain(text) => text,
        LogArg::Value(Value::String(text)) => text,
        LogArg::Value(value) => value.to_string(),
        LogArg::Failure(failure) => failure.render(),
        LogArg::Lazy(thunk) => entry_format(thunk()),
        LogArg::Aggregate(aggregate) => {
            let errors: Vec<String> = aggregate
                .errors
                .into_iter()
                .map(|e| entry_format(LogArg::Failure(e)))
                .collect();
            format!(
                "{} {}\n AggregatedErrors: {}",
                aggregate.message,
                aggregate.trace.as_deref().unwrap_or_default(),
                errors.join("\n")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_plain_and_value() {
        assert_eq!(entry_format("hello".into()), "hello");
        assert_eq!(entry_format(42.into()), "42");
        assert_eq!(entry_format(serde_json::json!("text").into()), "text");
        assert_eq!(entry_format(serde_json::json!({"a": 1}).into()), r#"{"a":1}"#);
        assert_eq!(entry_format(LogArg::debug(&Some(3))), "Some(3)");
    }

    #[test]
    fn test_failure_renders_message_and_trace() {
        assert_eq!(entry_format(Failure::new("boom").into()), "boom ");
        assert_eq!(
            entry_format(Failure::new("boom").with_trace("at main").into()),
            "boom at main"
        );

        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert_eq!(entry_format(LogArg::error(&err)), "outer failed caused by: disk gone");
    }

    #[test]
    fn test_lazy_invoked_once_and_result_formatted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let arg = LogArg::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Failure::new("deferred")
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(entry_format(arg), "deferred ");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_integer_width() {
        assert_eq!(entry_format(5i8.into()), "5");
        assert_eq!(entry_format((-5i16).into()), "-5");
        assert_eq!(entry_format(5isize.into()), "5");
        assert_eq!(entry_format(i128::MIN.into()), i128::MIN.to_string());
        assert_eq!(entry_format(u128::MAX.into()), u128::MAX.to_string());
    }

    #[test]
    fn test_resolve_runs_thunks_and_keeps_structure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let arg = LogArg::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            LogArg::lazy(|| Failure::new("late").with_trace("at job"))
        });

        let resolved = arg.resolve();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolved, ArgValue::Failure(Failure::new("late").with_trace("at job")));
        assert_eq!(entry_format(resolved.into()), "late at job");
    }

    #[test]
    fn test_resolved_value_serializes_tagged() {
        let json = serde_json::to_value(LogArg::from(Failure::new("boom")).resolve()).unwrap();
        assert_eq!(json["kind"], "failure");
        assert_eq!(json["value"]["message"], "boom");
    }

    #[test]
    fn test_nested_lazy() {
        let arg = LogArg::lazy(|| LogArg::lazy(|| "inner"));
        assert_eq!(entry_format(arg), "inner");
    }

    #[test]
    fn test_aggregate_contains_every_sub_error() {
        let aggregate = Aggregate::new(
            "2 tasks failed",
            vec![Failure::new("Error 1"), Failure::new("Error 2")],
        );
        let text = entry_format(aggregate.into());

        assert!(text.starts_with("2 tasks failed "));
        assert!(text.contains("AggregatedErrors: "));
        assert!(text.contains("Error 1"));
        assert!(text.contains("Error 2"));
        assert_eq!(text.lines().count(), 3);
    }
}
