//! Core metadata types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered mapping of metadata keys to arbitrary structured values.
///
/// A `Metadata` value is either the metadata accumulated so far for a path
/// (input to a plugin, read-only) or the fragment produced by one plugin's
/// extraction call. No schema is enforced at this layer; each plugin defines
/// its own keys by convention. Insertion order is preserved so serialized
/// fragments are stable.
///
/// # The empty-mapping sentinel
///
/// An empty `Metadata` is the single "no result" value used throughout the
/// pipeline. A plugin returns it to signal "no data for this input" (not an
/// error), and a cached empty fragment is a negative result served without
/// re-extraction. There is no separate "not found" type, and no way to
/// produce an empty fragment that means something else. Check with
/// [`Metadata::is_empty`].
///
/// # Example
///
/// ```rust
/// use metapipe::Metadata;
/// use serde_json::json;
///
/// let mut meta = Metadata::new();
/// meta.insert("width", json!(4000));
/// meta.insert("camera", json!({"make": "Canon"}));
/// assert_eq!(meta.get("width"), Some(&json!(4000)));
/// assert!(!meta.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: IndexMap<String, Value>,
}

impl Metadata {
    /// Create an empty metadata mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this mapping carries no entries.
    ///
    /// This is the pipeline's single miss/negative-result sentinel; see the
    /// type-level documentation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert a key/value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether the mapping contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merge another fragment into this mapping.
    ///
    /// Used by orchestrators to accumulate fragments in dependency order.
    /// Keys from `other` overwrite existing keys.
    pub fn merge(&mut self, other: Metadata) {
        self.entries.extend(other.entries);
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl From<IndexMap<String, Value>> for Metadata {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Metadata {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
