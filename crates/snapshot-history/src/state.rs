/// Value-oriented undo/redo history.
///
/// Every transition consumes the current `HistoryState` and returns the
/// next one. Boundary conditions (nothing to undo, nothing to redo, push
/// of an unchanged snapshot) return the input unchanged instead of failing.
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::HistoryConfig;
use crate::snapshot::Snapshot;

/// Undo/redo stacks around the active snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState<T> {
    /// Archived (filtered) snapshots, oldest first.
    past: VecDeque<T>,
    /// The active snapshot, stored unfiltered.
    present: T,
    /// Undone snapshots, nearest first.
    future: VecDeque<T>,
}

/// Read-only projection used to drive undo/redo controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_count: usize,
    pub redo_count: usize,
}

impl<T> HistoryState<T> {
    /// Starts a history with `initial` as the present and empty stacks.
    pub fn new(initial: T) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
        }
    }

    /// Discards all history, keeping `present` as the active snapshot.
    ///
    /// Used when a different document is loaded so undo never crosses
    /// document boundaries.
    pub fn clear_history(present: T) -> Self {
        Self::new(present)
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past(&self) -> &VecDeque<T> {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<T> {
        &self.future
    }

    /// Consumes the history, returning the active snapshot.
    pub fn into_present(self) -> T {
        self.present
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_count: self.past.len(),
            redo_count: self.future.len(),
        }
    }

    /// Steps back to the most recent archived snapshot.
    ///
    /// The current present becomes the first redo entry. Returns the
    /// history unchanged when there is nothing to undo.
    pub fn undo(mut self) -> Self {
        self.step_back();
        self
    }

    /// Re-applies the nearest undone snapshot.
    ///
    /// The current present is appended to the undo stack. Returns the
    /// history unchanged when there is nothing to redo.
    pub fn redo(mut self) -> Self {
        self.step_forward();
        self
    }

    pub(crate) fn step_back(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            tracing::trace!("Nothing to undo");
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        tracing::debug!(
            undo_count = self.past.len(),
            redo_count = self.future.len(),
            "Undo"
        );
        true
    }

    pub(crate) fn step_forward(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            tracing::trace!("Nothing to redo");
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        tracing::debug!(
            undo_count = self.past.len(),
            redo_count = self.future.len(),
            "Redo"
        );
        true
    }
}

impl<T: Snapshot> HistoryState<T> {
    /// Records `new_state` as the present.
    ///
    /// If `new_state` equals the present once ignored keys are removed from
    /// both, the history is returned unchanged. Otherwise the filtered
    /// present is archived, the undo stack is trimmed to `config.limit`
    /// (oldest first) and the redo stack is discarded.
    pub fn push(mut self, new_state: T, config: &HistoryConfig) -> Self {
        self.record(new_state, config);
        self
    }

    pub(crate) fn record(&mut self, new_state: T, config: &HistoryConfig) -> bool {
        let archived = self.present.without_keys(&config.ignore_keys);
        if new_state.without_keys(&config.ignore_keys) == archived {
            tracing::trace!("Snapshot unchanged, skipping history entry");
            return false;
        }

        self.past.push_back(archived);
        self.present = new_state;
        self.future.clear();

        self.enforce_limit(config.limit);

        tracing::debug!(undo_count = self.past.len(), "Recorded snapshot");
        true
    }
}

impl<T> HistoryState<T> {
    /// Drops the oldest archived entries until at most `limit` remain.
    pub(crate) fn enforce_limit(&mut self, limit: usize) {
        if self.past.len() > limit {
            let excess = self.past.len() - limit;
            self.past.drain(..excess);
            tracing::debug!(evicted = excess, limit, "Evicted oldest history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(text: &str) -> Value {
        json!({ "text": text })
    }

    fn pushed(texts: &[&str]) -> HistoryState<Value> {
        let config = HistoryConfig::default();
        texts
            .iter()
            .fold(HistoryState::new(doc("init")), |h, t| h.push(doc(t), &config))
    }

    #[test]
    fn test_new_is_empty() {
        let h = HistoryState::new(doc("a"));
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.present(), &doc("a"));
        assert_eq!(h.stats(), HistoryStats::default());
    }

    #[test]
    fn test_push_archives_present() {
        let h = pushed(&["a", "b"]);
        assert_eq!(h.present(), &doc("b"));
        assert_eq!(h.past(), &VecDeque::from(vec![doc("init"), doc("a")]));
        assert!(h.future().is_empty());
    }

    #[test]
    fn test_push_equal_is_noop() {
        let h = pushed(&["a"]);
        let again = h.clone().push(doc("a"), &HistoryConfig::default());
        assert_eq!(again, h);
    }

    #[test]
    fn test_push_only_volatile_change_is_noop() {
        let config = HistoryConfig::default();
        let h = HistoryState::new(json!({ "text": "a", "isPlaying": false }));
        let next = h
            .clone()
            .push(json!({ "text": "a", "isPlaying": true }), &config);
        assert_eq!(next, h);
        // The present keeps its original volatile value.
        assert_eq!(next.present()["isPlaying"], json!(false));
    }

    #[test]
    fn test_undo_moves_present_to_future() {
        let h = pushed(&["a", "b"]).undo();
        assert_eq!(h.present(), &doc("a"));
        assert_eq!(h.past(), &VecDeque::from(vec![doc("init")]));
        assert_eq!(h.future(), &VecDeque::from(vec![doc("b")]));
    }

    #[test]
    fn test_future_is_nearest_first() {
        let h = pushed(&["a", "b"]).undo().undo();
        assert_eq!(h.present(), &doc("init"));
        assert_eq!(h.future(), &VecDeque::from(vec![doc("a"), doc("b")]));
    }

    #[test]
    fn test_redo_moves_present_to_past() {
        let h = pushed(&["a", "b"]).undo().undo().redo();
        assert_eq!(h.present(), &doc("a"));
        assert_eq!(h.past(), &VecDeque::from(vec![doc("init")]));
        assert_eq!(h.future(), &VecDeque::from(vec![doc("b")]));
    }

    #[test]
    fn test_undo_at_boundary_is_noop() {
        let h = HistoryState::new(doc("a"));
        assert_eq!(h.clone().undo(), h);
        assert_eq!(h.clone().undo().undo().undo(), h);
    }

    #[test]
    fn test_redo_at_boundary_is_noop() {
        let h = pushed(&["a"]);
        assert_eq!(h.clone().redo(), h);
    }

    #[test]
    fn test_push_clears_future() {
        let config = HistoryConfig::default();
        let h = pushed(&["a", "b"]).undo().undo();
        assert_eq!(h.future().len(), 2);
        let h = h.push(doc("c"), &config);
        assert!(h.future().is_empty());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let config = HistoryConfig::default().with_limit(2);
        let h = ["a", "b", "c", "d"]
            .iter()
            .fold(HistoryState::new(doc("init")), |h, t| h.push(doc(t), &config));
        assert_eq!(h.past(), &VecDeque::from(vec![doc("b"), doc("c")]));
        assert_eq!(h.present(), &doc("d"));
    }

    #[test]
    fn test_zero_limit_keeps_no_undo() {
        let config = HistoryConfig::default().with_limit(0);
        let h = HistoryState::new(doc("a")).push(doc("b"), &config);
        assert_eq!(h.present(), &doc("b"));
        assert!(!h.can_undo());
    }

    #[test]
    fn test_lowered_limit_trims_on_next_push() {
        let h = pushed(&["a", "b", "c", "d"]);
        assert_eq!(h.past().len(), 4);
        let h = h.push(doc("e"), &HistoryConfig::default().with_limit(2));
        assert_eq!(h.past(), &VecDeque::from(vec![doc("c"), doc("d")]));
    }

    #[test]
    fn test_clear_history_resets_stacks() {
        let h = pushed(&["a", "b"]).undo();
        assert!(h.can_undo() && h.can_redo());
        let cleared = HistoryState::clear_history(h.into_present());
        assert_eq!(cleared, HistoryState::new(doc("a")));
    }

    #[test]
    fn test_stats_counts() {
        let h = pushed(&["a", "b", "c"]).undo();
        assert_eq!(
            h.stats(),
            HistoryStats {
                can_undo: true,
                can_redo: true,
                undo_count: 2,
                redo_count: 1,
            }
        );
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = pushed(&["a"]).stats();
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            json!({ "canUndo": true, "canRedo": false, "undoCount": 1, "redoCount": 0 })
        );
    }
}
