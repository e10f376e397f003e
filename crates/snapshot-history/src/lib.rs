/// Bounded undo/redo history over editor state snapshots.
///
/// Provides a value-oriented `HistoryState` whose transitions (push, undo,
/// redo) consume the current state and return the next one, and a
/// `HistoryStore` that owns a single history and applies actions to it
/// the way an editor state store applies reducer actions.
///
/// Volatile snapshot fields (playback position, export progress, ...) are
/// excluded from comparison and from archived entries via `HistoryConfig`.
pub mod config;
pub mod snapshot;
pub mod state;
pub mod store;

pub use config::HistoryConfig;
pub use snapshot::{filter_state_for_history, filter_with_defaults, Snapshot};
pub use state::{HistoryState, HistoryStats};
pub use store::{HistoryAction, HistoryStore};
