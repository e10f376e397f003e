/// Configuration for snapshot history.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// Maximum number of entries kept in the undo stack.
pub const DEFAULT_LIMIT: usize = 50;

/// Top-level snapshot fields that churn during playback and export.
///
/// They never participate in the "did anything change?" check and are
/// stripped from archived entries.
pub const DEFAULT_IGNORE_KEYS: &[&str] = &[
    "isPlaying",
    "currentTime",
    "currentFrame",
    "isExporting",
    "exportProgress",
];

/// Configuration for the history system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Max entries retained in the undo stack. Zero disables undo.
    pub limit: usize,
    /// Top-level field names excluded from comparison and storage.
    pub ignore_keys: BTreeSet<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            ignore_keys: default_ignore_keys(),
        }
    }
}

impl HistoryConfig {
    /// Returns a copy with a different undo limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns a copy whose ignore list is replaced by `keys`.
    pub fn with_ignore_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy that additionally ignores `key`.
    pub fn ignoring(mut self, key: impl Into<String>) -> Self {
        self.ignore_keys.insert(key.into());
        self
    }

    /// Returns `state` without the fields this config ignores.
    ///
    /// `HistoryConfig::default().filter(&state)` filters with the default
    /// ignore list.
    pub fn filter<T: Snapshot>(&self, state: &T) -> T {
        state.without_keys(&self.ignore_keys)
    }

    /// Whether `key` is excluded from history.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_keys.contains(key)
    }
}

/// The default ignore list as an owned set.
pub fn default_ignore_keys() -> BTreeSet<String> {
    DEFAULT_IGNORE_KEYS.iter().map(|k| k.to_string()).collect()
}
