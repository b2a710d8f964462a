//! # JSON Schema Export
//!
//! Renders a draft 2020-12 JSON Schema describing the example message
//! envelope `{"value": <document>}`. Objects are closed (every child is
//! required, nothing else allowed) and arrays have exactly their declared
//! size, so a message validates iff it has the tree's exact shape.

use serde_json::{json, Map, Value};

use dmt_core::DataType;

use crate::node::NodeRef;
use crate::tree::Tree;

/// `$schema` URI of the exported schemas.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

impl Tree {
    /// JSON Schema for messages of this tree.
    pub fn json_schema(&self) -> Value {
        json!({
            "$schema": SCHEMA_DIALECT,
            "type": "object",
            "properties": { "value": node_schema(self.root()) },
            "required": ["value"],
            "additionalProperties": false,
        })
    }
}

fn node_schema(node: NodeRef<'_>) -> Value {
    let data_type = node.data_type();
    match data_type {
        DataType::Object => {
            let mut properties = Map::new();
            let mut required = Vec::with_capacity(node.child_count());
            for child in node.children() {
                properties.insert(child.name().to_string(), node_schema(child));
                required.push(Value::from(child.name()));
            }
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            })
        }
        DataType::Array => {
            let size = node.size().unwrap_or(0);
            let items = node
                .children()
                .next()
                .map_or_else(|| json!({}), node_schema);
            json!({
                "type": "array",
                "items": items,
                "minItems": size,
                "maxItems": size,
            })
        }
        DataType::Primitive(kind) => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!(data_type.json_schema_type()));
            if let Some(unit) = node.unit() {
                schema.insert("description".to_string(), json!(format!("unit: {unit}")));
            }
            schema.insert("examples".to_string(), json!([kind.example()]));
            Value::Object(schema)
        }
    }
}
