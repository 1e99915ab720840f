//! Severity levels.
//!
//! # Responsibilities
//! - Define the default severities and their display hints
//! - Derive new levels from existing ones without mutation
//! - Resolve level signals case-insensitively
//!
//! # Design Decisions
//! - Levels are plain immutable values; ordering is by numeric severity
//! - Signals are `Cow<'static, str>` so the defaults are `const`

pub mod registry;

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

pub use registry::LevelRegistry;

/// Foreground colors a level may be rendered with on a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TintColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Display hint attached to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tint {
    pub color: TintColor,
    pub bold: bool,
}

impl Tint {
    pub const fn new(color: TintColor) -> Self {
        Self { color, bold: false }
    }

    pub const fn bold(color: TintColor) -> Self {
        Self { color, bold: true }
    }
}

/// A named severity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogLevel {
    /// Unique name, e.g. `"ERROR"`.
    pub signal: Cow<'static, str>,
    /// Numeric rank; higher is more severe.
    pub severity: i32,
    /// Optional terminal tint.
    pub display_hint: Option<Tint>,
}

/// Field overrides for [`LogLevel::derive`].
#[derive(Debug, Clone, Default)]
pub struct LevelOverrides {
    pub signal: Option<String>,
    pub severity: Option<i32>,
    /// `Some(None)` clears the hint.
    pub display_hint: Option<Option<Tint>>,
}

impl LogLevel {
    pub const VERBOSE: LogLevel = LogLevel::builtin("VERBOSE", 0, None);
    pub const DEBUG: LogLevel = LogLevel::builtin("DEBUG", 10, Some(Tint::new(TintColor::Blue)));
    pub const INFO: LogLevel = LogLevel::builtin("INFO", 20, Some(Tint::new(TintColor::Green)));
    pub const WARN: LogLevel = LogLevel::builtin("WARN", 30, Some(Tint::new(TintColor::Yellow)));
    pub const ERROR: LogLevel = LogLevel::builtin("ERROR", 40, Some(Tint::bold(TintColor::Red)));

    const fn builtin(signal: &'static str, severity: i32, display_hint: Option<Tint>) -> Self {
        Self {
            signal: Cow::Borrowed(signal),
            severity,
            display_hint,
        }
    }

    /// Create a custom level.
    pub fn new(signal: impl Into<String>, severity: i32) -> Self {
        Self {
            signal: Cow::Owned(signal.into()),
            severity,
            display_hint: None,
        }
    }

    /// The built-in levels, least severe first.
    pub fn defaults() -> [LogLevel; 5] {
        [
            LogLevel::VERBOSE,
            LogLevel::DEBUG,
            LogLevel::INFO,
            LogLevel::WARN,
            LogLevel::ERROR,
        ]
    }

    pub fn with_display_hint(mut self, hint: Tint) -> Self {
        self.display_hint = Some(hint);
        self
    }

    /// Return a new level with `overrides` applied on top of `self`.
    pub fn derive(&self, overrides: LevelOverrides) -> LogLevel {
        LogLevel {
            signal: overrides
                .signal
                .map(Cow::Owned)
                .unwrap_or_else(|| self.signal.clone()),
            severity: overrides.severity.unwrap_or(self.severity),
            display_hint: overrides.display_hint.unwrap_or(self.display_hint),
        }
    }

    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// Case-insensitive signal comparison, using Unicode upper-casing.
    pub fn matches_signal(&self, signal: &str) -> bool {
        self.signal
            .chars()
            .flat_map(char::to_uppercase)
            .eq(signal.chars().flat_map(char::to_uppercase))
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity
            .cmp(&other.severity)
            .then_with(|| self.signal.cmp(&other.signal))
            .then_with(|| self.display_hint.cmp(&other.display_hint))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let levels = LogLevel::defaults();
        for pair in levels.windows(2) {
            assert!(pair[0].severity < pair[1].severity);
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_derive_does_not_mutate_base() {
        let base = LogLevel::WARN;
        let notice = base.derive(LevelOverrides {
            signal: Some("NOTICE".into()),
            severity: Some(25),
            ..Default::default()
        });

        assert_eq!(notice.signal(), "NOTICE");
        assert_eq!(notice.severity, 25);
        assert_eq!(notice.display_hint, base.display_hint);
        assert_eq!(base, LogLevel::WARN);

        let plain = base.derive(LevelOverrides {
            display_hint: Some(None),
            ..Default::default()
        });
        assert!(plain.display_hint.is_none());
        assert_eq!(plain.signal(), "WARN");
    }

    #[test]
    fn test_matches_signal_ignores_case() {
        assert!(LogLevel::ERROR.matches_signal("error"));
        assert!(LogLevel::ERROR.matches_signal("Error"));
        assert!(!LogLevel::ERROR.matches_signal("warn"));
        assert!(LogLevel::new("ÉCHEC", 45).matches_signal("échec"));
        assert!(!LogLevel::ERROR.matches_signal("ERRORS"));
    }
}
