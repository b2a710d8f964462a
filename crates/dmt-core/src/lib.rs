//! # dmt-core — Foundational Types for Data Model Trees
//!
//! A data model tree describes how the JSON messages of heterogeneous IoT
//! devices are shaped: a flat list of named, typed nodes with parent/child
//! references. This crate holds the vocabulary shared by the tree engine
//! (`dmt-tree`) and its callers; it depends on nothing internal.
//!
//! ## Contents
//!
//! - [`types`] — the closed data type catalog (`object`, `array`, primitives)
//!   with example values.
//! - [`descriptor`] — raw node descriptors as collaborators store them.
//! - [`path`] — compiled root-to-node paths with `[*]` array steps.
//! - [`error`] — aggregated validation reports and the crate error type.
//! - [`config`] — caller-side limits for the exponential subtree matcher.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Schema problems are reported, never thrown one at a time.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod path;
pub mod types;

pub use config::{ConfigError, MatchLimits};
pub use descriptor::{DescriptorDocument, DescriptorInput, NodeDescriptor};
pub use error::{DmtError, ValidationReport, Violation, TREE_NODES_FIELD};
pub use path::{JsonPath, PathSegment};
pub use types::{DataType, PrimitiveKind};
