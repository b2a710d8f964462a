//! # Node Descriptors
//!
//! The raw, externally supplied description of one schema node, exactly as
//! collaborators store it: a name, a declared type name, the parent's name
//! and the ordered child names. Descriptors are unvalidated input; the tree
//! builder in `dmt-tree` turns a list of them into a tree or a report.
//!
//! The on-disk/document shape is
//!
//! ```json
//! { "name": "weather", "treeNodes": [
//!     { "name": "root", "type": "object", "children": ["temp"] },
//!     { "name": "temp", "type": "double", "parent": "root", "unit": "°C" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

/// One schema node before tree linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Unique (case-insensitive) node name.
    #[serde(default)]
    pub name: String,
    /// Declared type name; resolved against the type catalog.
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Name of the parent node; empty or absent for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Ordered child names. Absent is treated as empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    /// Array dimension. Only meaningful for `array` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Optional physical unit of a leaf value (e.g. `"°C"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl NodeDescriptor {
    /// A bare descriptor with a name and a type name.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            parent: None,
            children: None,
            size: None,
            unit: None,
        }
    }

    /// An `object` descriptor with the given children.
    pub fn object(name: impl Into<String>, children: &[&str]) -> Self {
        Self::new(name, "object").with_children(children)
    }

    /// An `array` descriptor with its single element child and dimension.
    pub fn array(name: impl Into<String>, element: &str, size: i64) -> Self {
        let mut d = Self::new(name, "array").with_children(&[element]);
        d.size = Some(size);
        d
    }

    /// A leaf descriptor of a primitive type.
    pub fn primitive(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, type_name)
    }

    /// Set the parent name.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Replace the child names.
    pub fn with_children(mut self, children: &[&str]) -> Self {
        self.children = Some(children.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// True if a non-empty parent name is declared.
    pub fn has_parent(&self) -> bool {
        self.parent.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// The declared parent name, if non-empty.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }

    /// Declared child names; empty when absent.
    pub fn children(&self) -> &[String] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// A named descriptor list as collaborators persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDocument {
    /// Display name of the data model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The flat node list.
    #[serde(rename = "treeNodes")]
    pub tree_nodes: Vec<NodeDescriptor>,
}

/// Either a full document or a bare descriptor array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DescriptorInput {
    /// `{ "treeNodes": [...] }`
    Document(DescriptorDocument),
    /// `[ ... ]`
    List(Vec<NodeDescriptor>),
}

impl DescriptorInput {
    /// The descriptor list regardless of the input shape.
    pub fn into_descriptors(self) -> Vec<NodeDescriptor> {
        match self {
            Self::Document(doc) => doc.tree_nodes,
            Self::List(list) => list,
        }
    }
}
