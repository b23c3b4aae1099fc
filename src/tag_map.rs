// Multi-valued tag storage
//
// Tag names are case-insensitive in Vorbis comments, so keys are kept
// lower-case. A key never maps to an empty value list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::field::FieldKind;

/// Values extracted from a filename, one per field
pub type FieldValues = BTreeMap<FieldKind, String>;

/// Mapping from tag name to one or more values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagMap(BTreeMap<String, Vec<String>>);

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(&key.to_lowercase()).map(Vec::as_slice)
    }

    /// First value bound to `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_lowercase())
    }

    /// Replace all values of `key`; an empty list removes the key
    pub fn set<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.0.remove(&key.to_lowercase());
        } else {
            self.0.insert(key.to_lowercase(), values);
        }
    }

    /// Append one value to `key`
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.0.entry(key.to_lowercase()).or_default().push(value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(&key.to_lowercase())
    }

    /// Remove a single value; returns whether it was present
    pub fn remove_value(&mut self, key: &str, value: &str) -> bool {
        let key = key.to_lowercase();
        let Some(values) = self.0.get_mut(&key) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        if values.is_empty() {
            self.0.remove(&key);
        }
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keys whose values differ from `other` (added, changed or removed)
    pub fn changed_keys<'a>(&'a self, other: &'a TagMap) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .0
            .keys()
            .chain(other.0.keys())
            .map(String::as_str)
            .filter(|k| self.0.get(*k) != other.0.get(*k))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

impl From<&FieldValues> for TagMap {
    fn from(values: &FieldValues) -> Self {
        values
            .iter()
            .map(|(kind, value)| (kind.name().to_string(), value.clone()))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tags = TagMap::new();
        for (key, value) in iter {
            tags.append(key.as_ref(), value);
        }
        tags
    }
}
