//! Level allow-lists.

use crate::level::LogLevel;

/// Case-insensitive allow-list of level signals. `None` lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelFilter {
    allowed: Option<Vec<String>>,
}

impl LevelFilter {
    pub fn new<I, S>(signals: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: signals.map(|signals| {
                signals
                    .into_iter()
                    .map(|s| s.as_ref().to_owned())
                    .collect()
            }),
        }
    }

    pub fn all() -> Self {
        Self { allowed: None }
    }

    pub fn allows(&self, level: &LogLevel) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.iter().any(|signal| level.matches_signal(signal)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter_allows_everything() {
        let filter = LevelFilter::all();
        assert!(LogLevel::defaults().iter().all(|level| filter.allows(level)));
    }

    #[test]
    fn test_filter_ignores_case() {
        let filter = LevelFilter::new(Some(["error", "Warn"]));
        assert!(filter.allows(&LogLevel::ERROR));
        assert!(filter.allows(&LogLevel::WARN));
        assert!(!filter.allows(&LogLevel::INFO));
        assert!(filter.allows(&LogLevel::new("warn", 31)));
    }

    #[test]
    fn test_filter_folds_non_ascii_case() {
        let filter = LevelFilter::new(Some(["störung"]));
        assert!(filter.allows(&LogLevel::new("STÖRUNG", 35)));
        assert!(!filter.allows(&LogLevel::new("STORUNG", 35)));
    }

    #[test]
    fn test_empty_filter_allows_nothing() {
        let filter = LevelFilter::new(Some(Vec::<String>::new()));
        assert!(!filter.allows(&LogLevel::ERROR));
    }
}
