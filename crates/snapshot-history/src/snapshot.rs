/// Snapshot filtering and structural comparison.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;

use serde_json::{Map, Value};

use crate::config::HistoryConfig;

/// An editor state value that can be recorded in history.
///
/// `PartialEq` is the structural equality used to detect no-op pushes.
/// `without_keys` returns a shallow copy lacking the named top-level fields;
/// types with fixed fields implement it by resetting those fields.
pub trait Snapshot: Clone + PartialEq {
    fn without_keys(&self, keys: &BTreeSet<String>) -> Self;
}

impl Snapshot for Value {
    /// Objects lose the ignored keys; scalars and arrays have no
    /// top-level fields and are returned as-is.
    fn without_keys(&self, keys: &BTreeSet<String>) -> Self {
        match self {
            Value::Object(map) => Value::Object(map.without_keys(keys)),
            other => other.clone(),
        }
    }
}

impl Snapshot for Map<String, Value> {
    fn without_keys(&self, keys: &BTreeSet<String>) -> Self {
        self.iter()
            .filter(|(k, _)| !keys.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<V: Clone + PartialEq> Snapshot for BTreeMap<String, V> {
    fn without_keys(&self, keys: &BTreeSet<String>) -> Self {
        self.iter()
            .filter(|(k, _)| !keys.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<V, S> Snapshot for HashMap<String, V, S>
where
    V: Clone + PartialEq,
    S: BuildHasher + Clone + Default,
{
    fn without_keys(&self, keys: &BTreeSet<String>) -> Self {
        self.iter()
            .filter(|(k, _)| !keys.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Returns `state` without the fields `config` ignores.
pub fn filter_state_for_history<T: Snapshot>(state: &T, config: &HistoryConfig) -> T {
    config.filter(state)
}

/// Returns `state` without the fields of the default ignore list.
pub fn filter_with_defaults<T: Snapshot>(state: &T) -> T {
    HistoryConfig::default().filter(state)
}
