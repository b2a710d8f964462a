//! # Tree Construction
//!
//! [`Tree::build`] turns a descriptor list into an immutable tree, or fails
//! with one aggregated [`ValidationReport`]. No partially built tree is ever
//! returned.
//!
//! ## Pipeline
//!
//! 1. **Validate** every descriptor, then the collection (see [`crate::validate`]).
//! 2. **Link** parent and children by exact name. An unresolved parent name,
//!    a node resolving to itself, or a resolved child count that differs from
//!    the declared child count is a violation.
//! 3. **Integrity traversal** from the unique parentless node. A cyclic
//!    traversal, or one that does not visit every node, is a violation.
//! 4. **Index**: on the same traversal order, compute each node's path and
//!    level, fill the [`PathIndex`] and collect the leaves.
//! 5. **Depth**: the deepest level (root = 1) must not exceed [`MAX_DEPTH`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::Value;

use dmt_core::{
    DataType, DescriptorInput, DmtError, JsonPath, NodeDescriptor, ValidationReport,
};

use crate::index::PathIndex;
use crate::node::{NodeId, NodeRef, TreeNode};
use crate::traverse::Preorder;
use crate::validate::{validate_descriptors, ValidatedDescriptor};

/// Maximum tree depth, the root counting as level 1.
pub const MAX_DEPTH: usize = 5;

/// A validated, linked and indexed data model tree.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: NodeId,
    /// Leaves in preorder.
    leaves: Vec<NodeId>,
    index: PathIndex,
    depth: usize,
}

impl Tree {
    /// Build a tree from a descriptor list.
    ///
    /// # Errors
    ///
    /// Returns every violation found by the first failing stage.
    pub fn build(descriptors: Vec<NodeDescriptor>) -> Result<Self, ValidationReport> {
        let count = descriptors.len();
        match Self::try_build(&descriptors) {
            Ok(tree) => {
                tracing::debug!(
                    nodes = tree.len(),
                    depth = tree.depth,
                    leaves = tree.leaves.len(),
                    "data model tree built"
                );
                Ok(tree)
            }
            Err(report) => {
                tracing::debug!(
                    descriptors = count,
                    violations = report.len(),
                    "data model tree rejected"
                );
                Err(report)
            }
        }
    }

    fn try_build(descriptors: &[NodeDescriptor]) -> Result<Self, ValidationReport> {
        let validated = validate_descriptors(descriptors)?;
        let (mut nodes, root) = link(validated)?;

        let mut traversal = Preorder::new(&nodes, root);
        let order: Vec<NodeId> = traversal.by_ref().collect();
        let mut report = ValidationReport::new();
        if traversal.is_cyclic() {
            report.add("Tree is cyclic or one node has multiple parents.");
        }
        if order.len() != nodes.len() {
            report.add(format!(
                "Tree is not properly traversable ({} of {} nodes reachable from the root).",
                order.len(),
                nodes.len()
            ));
        }
        if !report.is_empty() {
            return Err(report);
        }

        let mut index = PathIndex::default();
        let mut leaves = Vec::new();
        let mut depth = 0;
        for &id in &order {
            let (path, level) = match nodes[id.0].parent {
                Some(parent) => {
                    let parent = &nodes[parent.0];
                    let path = match parent.data_type {
                        DataType::Array => parent.path.element(),
                        _ => parent.path.child(nodes[id.0].name()),
                    };
                    (path, parent.level + 1)
                }
                None => (JsonPath::root(), 1),
            };
            let node = &mut nodes[id.0];
            node.path = path;
            node.level = level;
            index.insert(node.path.clone(), node.data_type);
            if node.children.is_empty() {
                leaves.push(id);
            }
            depth = depth.max(level);
        }

        if depth > MAX_DEPTH {
            report.add(format!(
                "The level of the tree must be <= {MAX_DEPTH}, but it is {depth}."
            ));
            return Err(report);
        }

        Ok(Self {
            nodes,
            root,
            leaves,
            index,
            depth,
        })
    }

    /// Parse a descriptor array or a `{"treeNodes": [...]}` document and build it.
    ///
    /// # Errors
    ///
    /// `DmtError::Serialization` for malformed JSON, `DmtError::Validation`
    /// when the descriptors do not form a valid tree.
    pub fn from_json(json: &str) -> Result<Self, DmtError> {
        let input: DescriptorInput = serde_json::from_str(json)?;
        Ok(Self::build(input.into_descriptors())?)
    }

    /// Like [`from_json`](Self::from_json) for an already parsed value.
    ///
    /// # Errors
    ///
    /// Same as [`from_json`](Self::from_json).
    pub fn from_value(value: Value) -> Result<Self, DmtError> {
        let input: DescriptorInput = serde_json::from_value(value)?;
        Ok(Self::build(input.into_descriptors())?)
    }

    pub(crate) fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// The root node (always an `object`).
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root)
    }

    /// The node with the given id, if it belongs to this tree's arena.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// The node with exactly this name.
    pub fn get(&self, name: &str) -> Option<NodeRef<'_>> {
        self.nodes
            .iter()
            .position(|n| n.name() == name)
            .map(|i| NodeRef::new(self, NodeId(i)))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a built tree has at least a root and one child.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaves in preorder.
    pub fn leaf_nodes(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> + '_ {
        self.leaves.iter().map(move |&id| NodeRef::new(self, id))
    }

    /// Deepest level; the root is level 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Largest child count of any node.
    pub fn max_fan_out(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.children.len())
            .max()
            .unwrap_or(0)
    }

    /// The normalized descriptors, in input order.
    pub fn descriptors(&self) -> impl ExactSizeIterator<Item = &NodeDescriptor> + '_ {
        self.nodes.iter().map(|n| &n.descriptor)
    }

    /// Preorder traversal over all nodes, restartable via [`Iter::reset`].
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            inner: Preorder::new(&self.nodes, self.root),
        }
    }

    /// The raw preorder traversal over node ids.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(&self.nodes, self.root)
    }

    /// Type of the value living at `path`; `None` if the path is not in the schema.
    pub fn lookup(&self, path: &str) -> Option<(&JsonPath, DataType)> {
        self.index.lookup(path)
    }

    pub fn path_index(&self) -> &PathIndex {
        &self.index
    }
}

/// Resolve names into arena links. Returns the nodes and the root id.
fn link(validated: Vec<ValidatedDescriptor>) -> Result<(Vec<TreeNode>, NodeId), ValidationReport> {
    let by_name: HashMap<String, usize> = validated
        .iter()
        .enumerate()
        .map(|(i, v)| (v.descriptor.name.clone(), i))
        .collect();
    let mut nodes: Vec<TreeNode> = validated
        .into_iter()
        .map(|v| TreeNode::new(v.descriptor, v.data_type, v.size))
        .collect();

    let mut report = ValidationReport::new();
    for i in 0..nodes.len() {
        let descriptor = &nodes[i].descriptor;
        let name = descriptor.name.clone();

        let mut parent = None;
        if let Some(parent_name) = descriptor.parent_name() {
            match by_name.get(parent_name) {
                None => report.add(format!(
                    "Parent {parent_name} of node {name} is not a known node."
                )),
                Some(&p) if p == i => {
                    report.add(format!("Node {name} cannot have itself as a parent."));
                }
                Some(&p) => parent = Some(NodeId(p)),
            }
        }

        let declared = descriptor.children();
        let mut seen = HashSet::new();
        let children: Vec<NodeId> = declared
            .iter()
            .filter_map(|c| by_name.get(c.as_str()).copied())
            .filter(|&c| seen.insert(c))
            .map(NodeId)
            .collect();
        if children.len() != declared.len() {
            report.add(format!(
                "There are unknown or repeated children in the children list of node {name}."
            ));
        }
        if children.contains(&NodeId(i)) {
            report.add(format!("Node {name} cannot be its own child."));
        }

        nodes[i].parent = parent;
        nodes[i].children = children;
    }

    let root = nodes.iter().position(|n| n.parent.is_none());
    match root {
        Some(root) if report.is_empty() => Ok((nodes, NodeId(root))),
        Some(_) => Err(report),
        None => {
            report.add("Tree is missing a root.");
            Err(report)
        }
    }
}

/// Restartable preorder iterator over the nodes of a [`Tree`].
#[derive(Debug, Clone)]
pub struct Iter<'t> {
    tree: &'t Tree,
    inner: Preorder<'t>,
}

impl Iter<'_> {
    /// Restart from the root.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl<'t> Iterator for Iter<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        self.inner.next().map(|id| NodeRef::new(tree, id))
    }
}

impl<'t> IntoIterator for &'t Tree {
    type Item = NodeRef<'t>;
    type IntoIter = Iter<'t>;

    fn into_iter(self) -> Iter<'t> {
        self.iter()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.iter() {
            writeln!(f, "{} jsonPath: {}", node.name(), node.path())?;
        }
        Ok(())
    }
}
