//! # Tree Nodes
//!
//! The tree is an arena: [`Tree`] owns a flat `Vec<TreeNode>` and every
//! parent/child relation is a [`NodeId`] index into it. Nothing owns anything
//! else, so there is no cyclic ownership and navigation is O(1) both ways.
//!
//! [`NodeRef`] is the read-only handle handed to callers: a node id bound to
//! the tree it belongs to.

use std::fmt;

use dmt_core::{DataType, JsonPath, NodeDescriptor};

use crate::tree::Tree;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in the arena (equals the descriptor's input position).
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One linked node of the arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// The normalized descriptor this node was built from.
    pub(crate) descriptor: NodeDescriptor,
    pub(crate) data_type: DataType,
    /// Array dimension; `None` for every non-array node.
    pub(crate) size: Option<usize>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Root-to-node path, filled in by the build-time traversal.
    pub(crate) path: JsonPath,
    /// Tree level; the root is level 1.
    pub(crate) level: usize,
}

impl TreeNode {
    pub(crate) fn new(descriptor: NodeDescriptor, data_type: DataType, size: Option<usize>) -> Self {
        Self {
            descriptor,
            data_type,
            size,
            parent: None,
            children: Vec::new(),
            path: JsonPath::root(),
            level: 0,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Read-only handle to a node of a built [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'t TreeNode {
        &self.tree.nodes()[self.id.0]
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Arena index of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node name as declared.
    pub fn name(&self) -> &'t str {
        self.node().name()
    }

    /// Resolved catalog type.
    pub fn data_type(&self) -> DataType {
        self.node().data_type
    }

    /// Declared array dimension; `None` unless this is an array.
    pub fn size(&self) -> Option<usize> {
        self.node().size
    }

    /// Measurement unit, if declared.
    pub fn unit(&self) -> Option<&'t str> {
        self.node().descriptor.unit.as_deref()
    }

    /// Parent handle; `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        self.node().parent.map(|id| NodeRef::new(tree, id))
    }

    /// Children in declared order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef::new(tree, id))
    }

    /// Number of resolved children.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// True for nodes without children.
    pub fn is_leaf(&self) -> bool {
        self.node().children.is_empty()
    }

    /// True for the node without a parent.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Root-to-node path; the root's path is empty.
    pub fn path(&self) -> &'t JsonPath {
        &self.node().path
    }

    /// Level in the tree; the root is level 1.
    pub fn level(&self) -> usize {
        self.node().level
    }

    /// The normalized descriptor this node was built from.
    pub fn descriptor(&self) -> &'t NodeDescriptor {
        &self.node().descriptor
    }

    /// This node and all its descendants, in preorder.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        crate::traverse::Preorder::new(tree.nodes(), self.id).map(move |id| NodeRef::new(tree, id))
    }

    /// Number of nodes in the subtree rooted here.
    pub fn subtree_len(&self) -> usize {
        self.descendants().count()
    }

    /// Largest child count within the subtree rooted here.
    pub fn max_fan_out(&self) -> usize {
        self.descendants().map(|n| n.child_count()).max().unwrap_or(0)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("type", &self.data_type())
            .field("path", &self.path().to_string())
            .finish()
    }
}
