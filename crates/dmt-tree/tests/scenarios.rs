//! Integration tests: end-to-end behaviour of built trees.

use dmt_core::{DataType, NodeDescriptor, PrimitiveKind};
use dmt_tree::{FieldMapping, Tree, MAX_DEPTH};
use serde_json::{json, Value};

fn mapping(pairs: &[(&str, &str)]) -> FieldMapping {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `root -> o1 -> o2 -> ... -> leaf`, `levels` levels deep in total.
fn object_chain(levels: usize) -> Vec<NodeDescriptor> {
    let names: Vec<String> = (0..levels - 1)
        .map(|i| if i == 0 { "root".to_string() } else { format!("o{i}") })
        .chain(std::iter::once("leaf".to_string()))
        .collect();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let node = match names.get(i + 1) {
                Some(child) => NodeDescriptor::object(name.as_str(), &[child.as_str()]),
                None => NodeDescriptor::primitive(name.as_str(), "int"),
            };
            if i == 0 {
                node
            } else {
                node.with_parent(names[i - 1].as_str())
            }
        })
        .collect()
}

#[test]
fn single_double_leaf_scenario() {
    let descriptors: Vec<NodeDescriptor> = serde_json::from_value(json!([
        {"name": "root", "type": "object", "children": ["v"]},
        {"name": "v", "type": "double", "parent": "root"}
    ]))
    .unwrap();
    let tree = Tree::build(descriptors).unwrap();

    let message: Value = serde_json::from_str(&tree.example_message()).unwrap();
    assert_eq!(message, json!({"value": {"v": 12.34}}));
    assert_eq!(
        tree.lookup("v").map(|(_, t)| t),
        Some(DataType::Primitive(PrimitiveKind::Double))
    );
}

#[test]
fn depth_limit_is_inclusive() {
    let five = Tree::build(object_chain(MAX_DEPTH)).unwrap();
    assert_eq!(five.depth(), 5);
    assert_eq!(five.get("leaf").unwrap().level(), 5);

    let err = Tree::build(object_chain(MAX_DEPTH + 1)).unwrap_err();
    assert!(err.mentions("level of the tree must be <= 5"));
}

#[test]
fn rejections_are_aggregated() {
    let err = Tree::build(vec![
        NodeDescriptor::object("root", &["a", "b", "c"]),
        NodeDescriptor::array("a", "x", 1).with_parent("root"),
        NodeDescriptor::primitive("b", "int")
            .with_parent("root")
            .with_children(&["y"]),
        NodeDescriptor::new("c", "object").with_parent("root"),
        NodeDescriptor::primitive("x", "int").with_parent("a"),
        NodeDescriptor::primitive("y", "int").with_parent("b"),
    ])
    .unwrap_err();
    assert_eq!(err.len(), 3);
    assert!(err.mentions("Node a is an array and needs a predefined dimension"));
    assert!(err.mentions("Node b is a primitive type but has children."));
    assert!(err.mentions("Node c is an object but has no children."));
    assert!(err.to_string().contains("treeNodes: "));
}

#[test]
fn identical_subtrees_under_different_parents_both_match() {
    let tree = Tree::build(vec![
        NodeDescriptor::object("root", &["indoor", "outdoor"]),
        NodeDescriptor::object("indoor", &["inside"]).with_parent("root"),
        NodeDescriptor::object("outdoor", &["outside"]).with_parent("root"),
        NodeDescriptor::object("inside", &["t1", "h1"]).with_parent("indoor"),
        NodeDescriptor::object("outside", &["t2", "h2"]).with_parent("outdoor"),
        NodeDescriptor::primitive("t1", "double").with_parent("inside"),
        NodeDescriptor::primitive("h1", "int").with_parent("inside"),
        NodeDescriptor::primitive("t2", "double").with_parent("outside"),
        NodeDescriptor::primitive("h2", "int").with_parent("outside"),
    ])
    .unwrap();
    let pattern = Tree::build(vec![
        NodeDescriptor::object("climate", &["temperature", "humidity"]),
        NodeDescriptor::primitive("temperature", "double").with_parent("climate"),
        NodeDescriptor::primitive("humidity", "int").with_parent("climate"),
    ])
    .unwrap();
    let pattern_names = pattern.len();

    let (nodes, mappings) = tree.find_subtree(pattern.root()).into_parts();
    let names: Vec<&str> = nodes
        .iter()
        .filter_map(|&id| tree.node(id))
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["inside", "outside"]);
    for per_match in &mappings {
        assert!(per_match.iter().all(|m| m.len() == pattern_names));
    }
    assert_eq!(
        mappings[1],
        vec![mapping(&[
            ("climate", "outside"),
            ("temperature", "t2"),
            ("humidity", "h2"),
        ])]
    );
}

#[test]
fn nested_permutations_merge_across_levels() {
    // Two interchangeable object children, each with two interchangeable leaves.
    let tree = Tree::build(vec![
        NodeDescriptor::object("root", &["l", "r"]),
        NodeDescriptor::object("l", &["l1", "l2"]).with_parent("root"),
        NodeDescriptor::object("r", &["r1", "r2"]).with_parent("root"),
        NodeDescriptor::primitive("l1", "int").with_parent("l"),
        NodeDescriptor::primitive("l2", "int").with_parent("l"),
        NodeDescriptor::primitive("r1", "int").with_parent("r"),
        NodeDescriptor::primitive("r2", "int").with_parent("r"),
    ])
    .unwrap();
    let matches = tree.find_subtree(tree.root());
    assert_eq!(matches.len(), 1);
    let all = matches.mappings();
    let mappings = all[0];
    // 2 orderings of the objects times 2 × 2 orderings of their leaves.
    assert_eq!(mappings.len(), 8);
    assert!(mappings.iter().all(|m| m.len() == tree.len()));
    let identity: FieldMapping = tree
        .iter()
        .map(|n| (n.name().to_string(), n.name().to_string()))
        .collect();
    assert_eq!(mappings[0], identity);
}

#[test]
fn example_message_validates_against_exported_schema() {
    let tree = Tree::from_value(json!({
        "name": "weather station",
        "treeNodes": [
            {"name": "root", "type": "object", "children": ["station", "readings"]},
            {"name": "station", "type": "string", "parent": "root"},
            {"name": "readings", "type": "array", "parent": "root", "children": ["reading"], "size": 3},
            {"name": "reading", "type": "object", "parent": "readings", "children": ["at", "temp", "raw"]},
            {"name": "at", "type": "date", "parent": "reading"},
            {"name": "temp", "type": "double", "parent": "reading", "unit": "°C"},
            {"name": "raw", "type": "binary", "parent": "reading"}
        ]
    }))
    .unwrap();

    let mut options = jsonschema::options();
    options.with_draft(jsonschema::Draft::Draft202012);
    let validator = options.build(&tree.json_schema()).unwrap();

    let message: Value = serde_json::from_str(&tree.example_message()).unwrap();
    assert!(validator.is_valid(&message));

    let mut short = message.clone();
    short["value"]["readings"]
        .as_array_mut()
        .unwrap()
        .pop();
    assert!(!validator.is_valid(&short));

    let mut extra = message;
    extra["value"]["unexpected"] = json!(1);
    assert!(!validator.is_valid(&extra));
}

#[test]
fn instantiated_paths_select_example_values() {
    let tree = Tree::build(vec![
        NodeDescriptor::object("root", &["grid"]),
        NodeDescriptor::array("grid", "row", 2).with_parent("root"),
        NodeDescriptor::array("row", "cell", 3).with_parent("grid"),
        NodeDescriptor::primitive("cell", "long").with_parent("row"),
    ])
    .unwrap();
    let document = tree.example_document();
    let cell = tree.get("cell").unwrap();

    assert_eq!(cell.path().select(&document).len(), 6);
    let one = cell.path().instantiate(&[1, 2]).unwrap();
    assert_eq!(one.to_string(), "grid[1][2]");
    assert_eq!(one.select(&document), vec![&json!(4_200_000_000_i64)]);
}
