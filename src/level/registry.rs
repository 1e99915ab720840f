//! Lookup table of known levels.

use super::LogLevel;

/// Known levels kept in severity order.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<LogLevel>,
}

impl LevelRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { levels: Vec::new() }
    }

    /// Add a level, replacing any existing level with the same signal.
    pub fn register(&mut self, level: LogLevel) {
        self.levels.retain(|existing| !existing.matches_signal(level.signal()));
        let pos = self.levels.partition_point(|existing| existing <= &level);
        self.levels.insert(pos, level);
    }

    /// Find a level by signal, ignoring case.
    pub fn lookup(&self, signal: &str) -> Option<&LogLevel> {
        self.levels.iter().find(|level| level.matches_signal(signal))
    }

    pub fn contains(&self, signal: &str) -> bool {
        self.lookup(signal).is_some()
    }

    /// Levels from least to most severe.
    pub fn iter(&self) -> impl Iterator<Item = &LogLevel> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for level in LogLevel::defaults() {
            registry.register(level);
        }
        registry
    }
}
