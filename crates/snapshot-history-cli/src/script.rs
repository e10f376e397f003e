/// Action scripts: parsing JSON-lines input and replaying it through a store.
use std::fmt;
use std::io::BufRead;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use snapshot_history::{HistoryAction, HistoryConfig, HistoryStats, HistoryStore};

/// One parsed action and the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptAction {
    pub line: usize,
    pub action: HistoryAction<Value>,
}

/// Outcome of a single replayed action.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub line: usize,
    pub action: &'static str,
    pub changed: bool,
    pub stats: HistoryStats,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} changed={} undo={} redo={}",
            self.line, self.action, self.changed, self.stats.undo_count, self.stats.redo_count
        )
    }
}

#[derive(Debug)]
pub struct Replay {
    pub store: HistoryStore<Value>,
    pub steps: Vec<Step>,
}

/// Parses one action per line. Blank lines and `#` or `//` comments are skipped.
pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<ScriptAction>> {
    let mut actions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read script line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let action = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid action on line {line_no}"))?;
        actions.push(ScriptAction {
            line: line_no,
            action,
        });
    }
    Ok(actions)
}

/// Replays `actions` into a fresh store.
///
/// The first action must be `push` or `clear`; its state seeds the history.
pub fn replay(actions: Vec<ScriptAction>, config: HistoryConfig) -> Result<Replay> {
    let mut actions = actions.into_iter();
    let Some(first) = actions.next() else {
        bail!("Script contains no actions");
    };
    let first_name = first.action.name();
    let seed = match first.action {
        HistoryAction::Push(state) | HistoryAction::Clear(state) => state,
        other => bail!(
            "Line {}: script must start with push or clear, found {}",
            first.line,
            other.name()
        ),
    };

    let mut store = HistoryStore::new(seed, config);
    let mut steps = vec![Step {
        line: first.line,
        action: first_name,
        changed: true,
        stats: store.stats(),
    }];

    for ScriptAction { line, action } in actions {
        let name = action.name();
        let changed = store.dispatch(action);
        steps.push(Step {
            line,
            action: name,
            changed,
            stats: store.stats(),
        });
    }

    tracing::info!(actions = steps.len(), "Replay finished");
    Ok(Replay { store, steps })
}
