//! # Path Index
//!
//! Maps every node's rendered path to its compiled [`JsonPath`] and declared
//! [`DataType`]. Built once during the build-time traversal and immutable
//! afterwards; payload extractors use it to answer "what type of value lives
//! at path P" without walking the tree.

use std::collections::HashMap;

use dmt_core::{DataType, JsonPath};

/// Immutable path-string → (compiled path, type) map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
    entries: HashMap<String, (JsonPath, DataType)>,
}

impl PathIndex {
    pub(crate) fn insert(&mut self, path: JsonPath, data_type: DataType) {
        self.entries.insert(path.to_string(), (path, data_type));
    }

    /// Direct key lookup. `None` means the path is not part of the schema.
    pub fn lookup(&self, path: &str) -> Option<(&JsonPath, DataType)> {
        self.entries.get(path).map(|(p, t)| (p, *t))
    }

    /// True if `path` is indexed.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by path string.
    pub fn entries(&self) -> Vec<(&str, &JsonPath, DataType)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|(k, (p, t))| (k.as_str(), p, *t))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }
}
