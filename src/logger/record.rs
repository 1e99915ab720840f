//! The structured record produced by each log call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::format::ArgValue;
use crate::level::LogLevel;

/// One log call, fully formatted.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub id: Uuid,
    /// The logger that produced this record.
    pub logger_id: Uuid,
    #[serde(serialize_with = "serialize_level")]
    pub level: LogLevel,
    /// The call arguments, deferred ones already evaluated.
    pub args: Vec<ArgValue>,
    /// One rendering per call argument.
    pub messages: Vec<String>,
    /// The formatted line handed to sinks.
    pub line: String,
    pub timestamp: DateTime<Utc>,
    pub channel: Option<String>,
}

fn serialize_level<S: serde::Serializer>(level: &LogLevel, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(level.signal())
}
