//! # Schema Validation
//!
//! Checks a descriptor list before any linking is attempted, in two stages.
//!
//! ## Per-descriptor checks
//!
//! Each descriptor passes through gates; a failed gate ends the checks for
//! that descriptor only, because later checks assume a minimally sane node:
//!
//! 1. Name non-empty, type non-empty and in the catalog (gate).
//! 2. Normalize: absent children become empty, non-array size becomes unset.
//! 3. At least one of children/parent is non-empty (gate).
//! 4. Primitive ⇒ no children. Object ⇒ at least one child.
//!    Array ⇒ exactly one child and size ≥ 2.
//! 5. Not its own child; its parent is not also one of its children.
//!
//! Every descriptor is checked, and all violations are reported together.
//!
//! ## Collection-wide checks
//!
//! Run only when every descriptor passed: case-insensitive name uniqueness,
//! and exactly one parentless descriptor, which must be an object.

use std::collections::HashMap;

use dmt_core::{DataType, NodeDescriptor, ValidationReport};

/// Minimum declared size of an `array` node.
pub const MIN_ARRAY_SIZE: i64 = 2;

/// A descriptor that passed the per-descriptor checks, with its type resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDescriptor {
    /// Normalized descriptor: `children` is always `Some`, `size` is `None`
    /// for every non-array type.
    pub descriptor: NodeDescriptor,
    pub data_type: DataType,
    /// Array dimension (arrays only).
    pub size: Option<usize>,
}

/// Validate and normalize one descriptor.
///
/// # Errors
///
/// Returns every violation found before the first failed gate.
pub fn validate_descriptor(
    node: &NodeDescriptor,
) -> Result<ValidatedDescriptor, ValidationReport> {
    let mut report = ValidationReport::new();

    if node.name.is_empty() {
        report.add("All data model tree nodes need a valid name.");
    }
    let data_type = if node.type_name.is_empty() {
        report.add("All data model tree nodes need a valid type.");
        None
    } else {
        let resolved = DataType::from_name(&node.type_name);
        if resolved.is_none() {
            report.add(format!("{} is not a known type.", node.type_name));
        }
        resolved
    };
    let data_type = match data_type {
        Some(t) if report.is_empty() => t,
        _ => return Err(report),
    };

    let mut descriptor = node.clone();
    descriptor.children = Some(node.children().to_vec());
    if data_type != DataType::Array {
        descriptor.size = None;
    }
    let name = &descriptor.name;
    let children = descriptor.children();

    if children.is_empty() && !descriptor.has_parent() {
        report.add(format!("Node {name} is not connected to the tree."));
        return Err(report);
    }

    let mut size = None;
    match data_type {
        DataType::Primitive(_) => {
            if !children.is_empty() {
                report.add(format!("Node {name} is a primitive type but has children."));
            }
        }
        DataType::Object => {
            if children.is_empty() {
                report.add(format!("Node {name} is an object but has no children."));
            }
        }
        DataType::Array => {
            if children.len() != 1 {
                report.add(format!(
                    "Node {name} is an array and needs exactly one child."
                ));
            }
            match descriptor.size.filter(|s| *s >= MIN_ARRAY_SIZE).map(usize::try_from) {
                Some(Ok(s)) => size = Some(s),
                _ => report.add(format!(
                    "Node {name} is an array and needs a predefined dimension of at least {MIN_ARRAY_SIZE}."
                )),
            }
        }
    }

    if children.iter().any(|c| c == name) {
        report.add(format!(
            "Node {name} is not allowed to have itself as a child."
        ));
    }
    if let Some(parent) = descriptor.parent_name() {
        if children.iter().any(|c| c == parent) {
            report.add(format!(
                "Node {name} is not allowed to have a parent which is also a child."
            ));
        }
    }

    report.into_result(ValidatedDescriptor {
        descriptor,
        data_type,
        size,
    })
}

/// Validate a whole descriptor list.
///
/// Per-descriptor violations of all descriptors are collected first; the
/// collection-wide checks only run when there are none.
///
/// # Errors
///
/// Returns the aggregated report of every violation found.
pub fn validate_descriptors(
    nodes: &[NodeDescriptor],
) -> Result<Vec<ValidatedDescriptor>, ValidationReport> {
    let mut report = ValidationReport::new();
    let mut validated = Vec::with_capacity(nodes.len());

    for node in nodes {
        match validate_descriptor(node) {
            Ok(v) => validated.push(v),
            Err(r) => report.extend(r),
        }
    }
    if !report.is_empty() {
        return Err(report);
    }

    report.extend(check_unique_names(&validated));
    report.extend(check_single_object_root(&validated));
    report.into_result(validated)
}

/// Each case-insensitive name may occur once. A duplicated name is reported once.
fn check_unique_names(nodes: &[ValidatedDescriptor]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for node in nodes {
        *counts.entry(node.descriptor.name.to_lowercase()).or_default() += 1;
    }
    for node in nodes {
        let key = node.descriptor.name.to_lowercase();
        if let Some(count) = counts.get_mut(&key) {
            if *count >= 2 {
                report.add(format!(
                    "Node {} has a non-unique name.",
                    node.descriptor.name
                ));
                // Report each duplicated name only once.
                *count = 0;
            }
        }
    }
    report
}

fn check_single_object_root(nodes: &[ValidatedDescriptor]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let roots: Vec<&ValidatedDescriptor> = nodes
        .iter()
        .filter(|n| !n.descriptor.has_parent())
        .collect();
    match roots.as_slice() {
        [root] => {
            if root.data_type != DataType::Object {
                report.add("Tree root must be an object.");
            }
        }
        _ => report.add(format!(
            "Tree is missing a root or has too many roots (found {}).",
            roots.len()
        )),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmt_core::PrimitiveKind;

    fn messages(report: &ValidationReport) -> Vec<&str> {
        report.violations().iter().map(|v| v.message.as_str()).collect()
    }

    #[test]
    fn test_empty_name_and_type_both_reported() {
        let err = validate_descriptor(&NodeDescriptor::new("", "")).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(err.mentions("valid name"));
        assert!(err.mentions("valid type"));
    }

    #[test]
    fn test_unknown_type_is_gate() {
        // Unknown type stops before the connectivity check would also fire.
        let err = validate_descriptor(&NodeDescriptor::new("x", "float")).unwrap_err();
        assert_eq!(messages(&err), vec!["float is not a known type."]);
    }

    #[test]
    fn test_type_lookup_is_case_insensitive() {
        let v = validate_descriptor(&NodeDescriptor::new("x", "Double").with_parent("root"))
            .unwrap();
        assert_eq!(v.data_type, DataType::Primitive(PrimitiveKind::Double));
    }

    #[test]
    fn test_names_and_types_are_not_trimmed() {
        let err = validate_descriptor(&NodeDescriptor::new("x", " double ").with_parent("root"))
            .unwrap_err();
        assert_eq!(messages(&err), vec![" double  is not a known type."]);

        let v = validate_descriptor(&NodeDescriptor::new(" ", "int").with_parent("root")).unwrap();
        assert_eq!(v.descriptor.name, " ");
    }

    #[test]
    fn test_floating_node_is_gate() {
        let err = validate_descriptor(&NodeDescriptor::new("x", "object")).unwrap_err();
        assert_eq!(messages(&err), vec!["Node x is not connected to the tree."]);
    }

    #[test]
    fn test_normalization() {
        let mut d = NodeDescriptor::primitive("t", "int").with_parent("root");
        d.size = Some(9);
        let v = validate_descriptor(&d).unwrap();
        assert_eq!(v.descriptor.size, None);
        assert_eq!(v.descriptor.children, Some(Vec::new()));
        assert_eq!(v.size, None);
    }

    #[test]
    fn test_primitive_with_children_rejected() {
        let d = NodeDescriptor::primitive("t", "int")
            .with_parent("root")
            .with_children(&["x"]);
        let err = validate_descriptor(&d).unwrap_err();
        assert!(err.mentions("primitive type but has children"));
    }

    #[test]
    fn test_object_without_children_rejected() {
        let d = NodeDescriptor::new("o", "object").with_parent("root");
        let err = validate_descriptor(&d).unwrap_err();
        assert!(err.mentions("object but has no children"));
    }

    #[test]
    fn test_array_rules() {
        let ok = validate_descriptor(&NodeDescriptor::array("a", "e", 2).with_parent("root"))
            .unwrap();
        assert_eq!(ok.size, Some(2));

        let err = validate_descriptor(&NodeDescriptor::array("a", "e", 1).with_parent("root"))
            .unwrap_err();
        assert!(err.mentions("predefined dimension"));

        let mut no_size = NodeDescriptor::array("a", "e", 2).with_parent("root");
        no_size.size = None;
        assert!(validate_descriptor(&no_size)
            .unwrap_err()
            .mentions("predefined dimension"));

        let two = NodeDescriptor::array("a", "e", 3)
            .with_parent("root")
            .with_children(&["e", "f"]);
        assert!(validate_descriptor(&two)
            .unwrap_err()
            .mentions("exactly one child"));
    }

    #[test]
    fn test_self_child_and_parent_child_rejected_together() {
        let d = NodeDescriptor::object("o", &["o", "p"]).with_parent("p");
        let err = validate_descriptor(&d).unwrap_err();
        assert!(err.mentions("itself as a child"));
        assert!(err.mentions("parent which is also a child"));
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_all_descriptors_reported() {
        let nodes = vec![
            NodeDescriptor::object("root", &["a", "b"]),
            NodeDescriptor::new("a", "nope").with_parent("root"),
            NodeDescriptor::new("b", "object").with_parent("root"),
        ];
        let err = validate_descriptors(&nodes).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(err.mentions("nope is not a known type"));
        assert!(err.mentions("Node b is an object but has no children"));
    }

    #[test]
    fn test_duplicate_names_case_insensitive() {
        let nodes = vec![
            NodeDescriptor::object("root", &["Temp", "temp"]),
            NodeDescriptor::primitive("Temp", "double").with_parent("root"),
            NodeDescriptor::primitive("temp", "double").with_parent("root"),
        ];
        let err = validate_descriptors(&nodes).unwrap_err();
        assert_eq!(messages(&err), vec!["Node Temp has a non-unique name."]);
    }

    #[test]
    fn test_root_count_and_type() {
        let two_roots = vec![
            NodeDescriptor::object("r1", &["a"]),
            NodeDescriptor::object("r2", &["b"]),
            NodeDescriptor::primitive("a", "int").with_parent("r1"),
            NodeDescriptor::primitive("b", "int").with_parent("r2"),
        ];
        assert!(validate_descriptors(&two_roots)
            .unwrap_err()
            .mentions("missing a root or has too many roots"));

        let no_root = vec![
            NodeDescriptor::object("a", &["b"]).with_parent("b"),
            NodeDescriptor::object("b", &["c"]).with_parent("a"),
            NodeDescriptor::primitive("c", "int").with_parent("b"),
        ];
        assert!(validate_descriptors(&no_root)
            .unwrap_err()
            .mentions("missing a root"));

        let array_root = vec![
            NodeDescriptor::array("r", "e", 2),
            NodeDescriptor::primitive("e", "int").with_parent("r"),
        ];
        assert!(validate_descriptors(&array_root)
            .unwrap_err()
            .mentions("root must be an object"));
    }

    #[test]
    fn test_collection_checks_aggregate() {
        let nodes = vec![
            NodeDescriptor::array("r", "e", 2),
            NodeDescriptor::array("R", "e", 2),
            NodeDescriptor::primitive("e", "int").with_parent("r"),
        ];
        let err = validate_descriptors(&nodes).unwrap_err();
        assert!(err.mentions("non-unique name"));
        assert!(err.mentions("too many roots"));
    }
}
