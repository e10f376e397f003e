/// Single-owner store that applies history actions in place.
///
/// The editor keeps one `HistoryStore` per open document and dispatches
/// actions from its input handlers; the UI reads `present()` and `stats()`.
use serde::{Deserialize, Serialize};

use crate::config::HistoryConfig;
use crate::snapshot::Snapshot;
use crate::state::{HistoryState, HistoryStats};

/// A history transition, as dispatched by the editor.
///
/// Serialized adjacently tagged: `{"action": "push", "state": {...}}`,
/// `{"action": "undo"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "state", rename_all = "snake_case")]
pub enum HistoryAction<T> {
    /// Record a new snapshot.
    Push(T),
    Undo,
    Redo,
    /// Drop all history and start over from the given snapshot.
    Clear(T),
}

impl<T> HistoryAction<T> {
    /// Short lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            HistoryAction::Push(_) => "push",
            HistoryAction::Undo => "undo",
            HistoryAction::Redo => "redo",
            HistoryAction::Clear(_) => "clear",
        }
    }
}

/// Owns the canonical `HistoryState` of one editing session.
#[derive(Debug, Clone)]
pub struct HistoryStore<T> {
    history: HistoryState<T>,
    config: HistoryConfig,
}

impl<T: Snapshot> HistoryStore<T> {
    pub fn new(initial: T, config: HistoryConfig) -> Self {
        Self {
            history: HistoryState::new(initial),
            config,
        }
    }

    /// Applies `action`. Returns whether the present snapshot changed.
    ///
    /// `Clear` always counts as a change since it replaces the document.
    pub fn dispatch(&mut self, action: HistoryAction<T>) -> bool {
        let name = action.name();
        let changed = match action {
            HistoryAction::Push(state) => self.history.record(state, &self.config),
            HistoryAction::Undo => self.history.step_back(),
            HistoryAction::Redo => self.history.step_forward(),
            HistoryAction::Clear(state) => {
                self.history = HistoryState::clear_history(state);
                tracing::debug!("History cleared");
                true
            }
        };
        tracing::trace!(action = name, changed, "Dispatched history action");
        changed
    }

    pub fn push(&mut self, state: T) -> bool {
        self.dispatch(HistoryAction::Push(state))
    }

    pub fn undo(&mut self) -> bool {
        self.dispatch(HistoryAction::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.dispatch(HistoryAction::Redo)
    }

    /// Replaces the document, discarding undo and redo history.
    pub fn load_document(&mut self, present: T) {
        self.dispatch(HistoryAction::Clear(present));
    }

    pub fn present(&self) -> &T {
        self.history.present()
    }

    pub fn history(&self) -> &HistoryState<T> {
        &self.history
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Swaps the configuration, trimming the undo stack to the new limit.
    pub fn set_config(&mut self, config: HistoryConfig) {
        self.history.enforce_limit(config.limit);
        self.config = config;
    }

    pub fn stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn into_history(self) -> HistoryState<T> {
        self.history
    }
}
