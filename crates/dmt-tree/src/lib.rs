//! # dmt-tree — Data Model Tree Engine
//!
//! Turns a flat list of IoT schema node descriptors into a validated,
//! immutable tree and answers questions about it.
//!
//! ## Pipeline
//!
//! ```text
//! descriptors → validate → link → preorder integrity check → path index
//!                                                            ├─ example message
//!                                                            ├─ JSON Schema
//!                                                            ├─ subtree matches
//!                                                            └─ leaf path matches
//! ```
//!
//! ## Modules
//!
//! - [`validate`] — per-descriptor and collection-wide schema rules.
//! - [`tree`] — [`Tree::build`], accessors, traversal entry points.
//! - [`node`] — arena ids and the [`NodeRef`] handle.
//! - [`traverse`] — restartable preorder with cycle detection.
//! - [`index`] — path string → (compiled path, type).
//! - [`permute`] — lazy index permutations for the matcher.
//! - [`matcher`] — sibling-order-independent subtree search.
//! - [`leaf_match`] — chain patterns against tree leaves.
//! - `example`, `json_schema` — message rendering and schema export.
//!
//! ## Crate Policy
//!
//! - Trees are immutable after construction; rebuild to change a schema.
//! - Every schema problem surfaces through one [`ValidationReport`](dmt_core::ValidationReport).
//! - No `unsafe` code. No `panic!()` or `.unwrap()` outside tests.

mod example;
pub mod index;
mod json_schema;
pub mod leaf_match;
pub mod matcher;
pub mod node;
pub mod permute;
pub mod traverse;
pub mod tree;
pub mod validate;

pub use index::PathIndex;
pub use json_schema::SCHEMA_DIALECT;
pub use leaf_match::LeafPath;
pub use matcher::{FieldMapping, SubtreeMatch, SubtreeMatches};
pub use node::{NodeId, NodeRef, TreeNode};
pub use permute::IndexPermutations;
pub use traverse::Preorder;
pub use tree::{Iter, Tree, MAX_DEPTH};
pub use validate::{validate_descriptors, ValidatedDescriptor};
