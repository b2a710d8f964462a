//! # Example Messages
//!
//! Renders one sample payload that conforms to a tree. The root is not a
//! key of the document: its children populate the top-level object. Arrays
//! repeat their single element child `size` times, each repetition expanded
//! independently; primitives take the catalog's canonical example value.
//!
//! Generation is deterministic, so two builds of the same descriptors yield
//! identical examples.

use serde_json::{Map, Value};

use dmt_core::DataType;

use crate::node::NodeRef;
use crate::tree::Tree;

impl Tree {
    /// The example document (without the `value` envelope).
    pub fn example_document(&self) -> Value {
        render(self.root())
    }

    /// The example message: `{"value": <document>}` as a compact JSON string.
    pub fn example_message(&self) -> String {
        format!("{{\"value\": {}}}", self.example_document())
    }
}

fn render(node: NodeRef<'_>) -> Value {
    match node.data_type() {
        DataType::Object => {
            let mut members = Map::new();
            for child in node.children() {
                members.insert(child.name().to_string(), render(child));
            }
            Value::Object(members)
        }
        DataType::Array => {
            let size = node.size().unwrap_or(0);
            let mut items = Vec::new();
            for _ in 0..size {
                items.extend(node.children().map(render));
            }
            Value::Array(items)
        }
        DataType::Primitive(kind) => kind.example(),
    }
}
