//! Per-observation and per-sample metadata maps.
//!
//! Each row and column of a table may carry a small key/value map (taxonomy
//! assignments, barcodes, subject age, ...). Lookups for absent keys return
//! `None` instead of failing, because grouping and filtering code routinely
//! probes for keys it does not know are present.
//!
//! Metadata values are [`serde_json::Value`]s: observation metadata in
//! particular is heterogeneous (taxonomy entries are lists of strings, ages
//! are numbers), and the maps are carried verbatim into the exchange format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered metadata map attached to one observation or sample.
///
/// Maps are treated as immutable once attached to a table; derived tables may
/// share their contents by clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataMap {
    entries: BTreeMap<String, Value>,
}

impl MetadataMap {
    /// An empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, returning `None` when it is absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert a key/value pair, returning any value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Number of keys in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, Value>> for MetadataMap {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Normalize a metadata sequence supplied at construction time.
///
/// Entry-level `None`s become empty maps, so every position supports the
/// `None`-on-absent-key lookup contract.
pub(crate) fn normalize_metadata(entries: Vec<Option<MetadataMap>>) -> Vec<MetadataMap> {
    entries.into_iter().map(Option::unwrap_or_default).collect()
}
