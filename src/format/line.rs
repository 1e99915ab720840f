//! Line layout.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::json;

use crate::level::LogLevel;

/// Inputs to a line formatter.
#[derive(Debug, Clone, Copy)]
pub struct LineParts<'a> {
    pub time: DateTime<Utc>,
    pub level: &'a LogLevel,
    pub channel: Option<&'a str>,
    pub messages: &'a [String],
}

/// `HH:MM:SS.ff` in 24-hour time, sub-second digits truncated.
pub fn clock_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // Leap seconds report >= 1000ms.
    let centis = (time.timestamp_subsec_millis() / 10).min(99);
    format!("{}.{:02}", time.format("%H:%M:%S"), centis)
}

/// Default layout: `|HH:MM:SS.ff|SIGNAL|[channel] msg1 msg2`.
pub fn line_format(parts: &LineParts<'_>) -> String {
    let clock = clock_time(&parts.time.with_timezone(&Local));
    let channel = match parts.channel {
        Some(channel) => format!("[{channel}] "),
        None => " ".to_string(),
    };
    format!(
        "|{clock}|{}|{channel}{}",
        parts.level.signal(),
        parts.messages.join(" ")
    )
}

/// One JSON object per line.
pub fn json_line_format(parts: &LineParts<'_>) -> String {
    json!({
        "time": parts.time.to_rfc3339(),
        "level": parts.level.signal(),
        "channel": parts.channel,
        "messages": parts.messages,
    })
    .to_string()
}
