//! Metrics collection.
//!
//! # Metrics
//! - `logbus_records_total` (counter): records emitted, by level
//! - `logbus_sink_writes_total` (counter): successful sink writes, by sink
//! - `logbus_sink_failures_total` (counter): failed sink writes, by sink
//!
//! # Design Decisions
//! - Counters go through the `metrics` facade; without an installed
//!   recorder every update is a no-op
//! - Level labels use the signal, so custom levels get their own series

use metrics::counter;

/// Record one emitted log record.
pub fn record_emitted(level: &str) {
    counter!("logbus_records_total", "level" => level.to_string()).increment(1);
}

/// Record a successful sink write.
pub fn record_sink_write(sink: &'static str) {
    counter!("logbus_sink_writes_total", "sink" => sink).increment(1);
}

/// Record a failed sink write.
pub fn record_sink_failure(sink: &'static str) {
    counter!("logbus_sink_failures_total", "sink" => sink).increment(1);
}
