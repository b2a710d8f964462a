//! # Leaf Path Matching
//!
//! Visualization fields are described by chain patterns (every node has at
//! most one child), e.g. `array -> array -> double` for a 2-D series. A chain
//! is satisfied by any leaf of the same type that sits below at least as many
//! arrays as the chain contains. The result feeds value-log extraction: one
//! [`LeafPath`] per satisfying leaf.

use serde::Serialize;

use dmt_core::{DataType, JsonPath};

use crate::node::NodeRef;
use crate::tree::Tree;

/// A tree leaf that satisfies a chain pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafPath {
    /// Name of the tree leaf.
    pub name: String,
    /// Type of the pattern root.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Size of the pattern root (set when it is an array).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    /// Unit of the tree leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Symbolic path of the tree leaf.
    pub path: JsonPath,
}

/// Follow the first-child chain to its leaf, counting arrays on the way.
fn chain_leaf(pattern: NodeRef<'_>) -> (NodeRef<'_>, usize) {
    let mut arrays = 0;
    let mut current = pattern;
    loop {
        if current.data_type() == DataType::Array {
            arrays += 1;
        }
        match current.children().next() {
            Some(child) => current = child,
            None => return (current, arrays),
        }
    }
}

impl Tree {
    /// Leaf paths of this tree satisfying the chain starting at `pattern`, in
    /// leaf order, without duplicates.
    pub fn matching_leaf_paths(&self, pattern: NodeRef<'_>) -> Vec<LeafPath> {
        let (pattern_leaf, dimensions) = chain_leaf(pattern);
        let mut paths: Vec<LeafPath> = Vec::new();
        for leaf in self.leaf_nodes() {
            // A leaf is never an array, so its array ancestors are its `[*]` steps.
            if leaf.data_type() != pattern_leaf.data_type()
                || leaf.path().array_depth() < dimensions
            {
                continue;
            }
            let found = LeafPath {
                name: leaf.name().to_string(),
                data_type: pattern.data_type(),
                dimension: pattern.size(),
                unit: leaf.unit().map(str::to_string),
                path: leaf.path().clone(),
            };
            if !paths.contains(&found) {
                paths.push(found);
            }
        }
        tracing::debug!(
            pattern = pattern.name(),
            dimensions,
            paths = paths.len(),
            "leaf paths matched"
        );
        paths
    }
}
