//! # Preorder Traversal
//!
//! Depth-first, parent-before-children iteration over the node arena,
//! children in declared order. The same iterator serves callers (via
//! [`Tree::iter`](crate::Tree::iter)) and the builder, which uses it as the
//! final integrity check on linked nodes.
//!
//! ## Cycle and multi-parent detection
//!
//! The iterator keeps a visited set. A node is expanded at most once, so the
//! iteration always terminates. It flags the traversal as cyclic when
//!
//! - a node is reached a second time (a cycle, or a node listed as a child
//!   by two parents), or
//! - a node is reached from a node that is not its designated parent (the
//!   child lists and parent names of the input disagree).
//!
//! Offending nodes are skipped rather than yielded, which also makes the
//! builder's visited-count check fail.

use crate::node::{NodeId, TreeNode};

/// Restartable preorder iterator yielding node ids.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    nodes: &'a [TreeNode],
    start: NodeId,
    /// Pending nodes paired with the node they were reached from.
    stack: Vec<(NodeId, Option<NodeId>)>,
    visited: Vec<bool>,
    cyclic: bool,
}

impl<'a> Preorder<'a> {
    /// Start a traversal of the subtree rooted at `start`.
    pub fn new(nodes: &'a [TreeNode], start: NodeId) -> Self {
        let mut it = Self {
            nodes,
            start,
            stack: Vec::new(),
            visited: Vec::new(),
            cyclic: false,
        };
        it.reset();
        it
    }

    /// Restart from the start node, clearing the visited set and the cyclic flag.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.visited.clear();
        self.visited.resize(self.nodes.len(), false);
        self.cyclic = false;
        if let Some(node) = self.nodes.get(self.start.0) {
            self.stack.push((self.start, node.parent));
        }
    }

    /// True once the traversal has met a node twice or through the wrong parent.
    ///
    /// Only meaningful after the iterator has been drained.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, via)) = self.stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                self.cyclic = true;
                continue;
            };
            if self.visited[id.0] || node.parent != via {
                self.cyclic = true;
                continue;
            }
            self.visited[id.0] = true;
            self.stack
                .extend(node.children.iter().rev().map(|&child| (child, Some(id))));
            return Some(id);
        }
        None
    }
}
