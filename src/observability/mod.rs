//! Observability of logbus itself.
//!
//! # Data Flow
//! ```text
//! Logger / sinks produce:
//!     → logging.rs (tracing diagnostics: attach, detach, write failures)
//!     → metrics.rs (records emitted, sink writes, sink failures)
//! ```
//!
//! # Design Decisions
//! - Library code only emits; installing a subscriber or recorder is the
//!   application's choice
//! - Metrics are cheap (facade counters, no-op without a recorder)

pub mod logging;
pub mod metrics;
