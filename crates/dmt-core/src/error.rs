//! # Error Types — Structured Validation Reports
//!
//! Schema problems are never thrown one at a time. Every stage of tree
//! construction appends [`Violation`]s to a [`ValidationReport`]; stages
//! compose by merging reports, and construction fails atomically with the
//! complete report so a schema author sees the full correction list.
//!
//! Everything that is not a schema violation (unknown type names outside
//! descriptor validation, malformed path strings, configuration, JSON input)
//! is a [`DmtError`].

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;

/// Field key under which all tree-structure violations are reported.
pub const TREE_NODES_FIELD: &str = "treeNodes";

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Logical field the violation belongs to (e.g. `"treeNodes"`).
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Create a violation under the `treeNodes` field.
    pub fn tree_nodes(message: impl Into<String>) -> Self {
        Self {
            field: TREE_NODES_FIELD.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered collection of violations found in one validation pass.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("could not create the data model tree, because some fields are invalid:\n{}", render(.violations))]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation under the `treeNodes` field.
    pub fn add(&mut self, message: impl Into<String>) {
        self.violations.push(Violation::tree_nodes(message));
    }

    /// Record an arbitrary violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Merge another report into this one, preserving order.
    pub fn extend(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// True if any violation message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.violations.iter().any(|v| v.message.contains(needle))
    }

    /// `Ok(value)` when the report is empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationReport> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<Violation> for ValidationReport {
    fn from(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

/// Top-level error type for data model tree operations.
#[derive(Error, Debug)]
pub enum DmtError {
    /// The descriptor list does not form a valid tree.
    #[error(transparent)]
    Validation(#[from] ValidationReport),

    /// A type name is not in the catalog.
    #[error("{0} is not a known type")]
    UnknownType(String),

    /// A path string or path instantiation is malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Matcher limits or other configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Descriptor input could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_ok() {
        let report = ValidationReport::new();
        assert!(report.is_empty());
        assert_eq!(report.into_result(7).unwrap(), 7);
    }

    #[test]
    fn test_report_collects_in_order() {
        let mut report = ValidationReport::new();
        report.add("first");
        report.add("second");
        assert_eq!(report.len(), 2);
        assert_eq!(report.violations()[0].message, "first");
        assert_eq!(report.violations()[1].field, TREE_NODES_FIELD);
        assert!(report.mentions("sec"));
        assert!(report.into_result(()).is_err());
    }

    #[test]
    fn test_report_merge() {
        let mut a = ValidationReport::new();
        a.add("a");
        let mut b = ValidationReport::new();
        b.add("b");
        b.add("c");
        a.extend(b);
        let messages: Vec<String> = a.into_inner().into_iter().map(|v| v.message).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_report_display_lists_every_violation() {
        let mut report = ValidationReport::new();
        report.add("Node x has no unique name.");
        report.add("Tree root must be an object.");
        let display = report.to_string();
        assert!(display.contains("treeNodes: Node x has no unique name."));
        assert!(display.contains("treeNodes: Tree root must be an object."));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let report = ValidationReport::from(Violation::tree_nodes("broken"));
        let err = DmtError::from(report.clone());
        assert_eq!(err.to_string(), report.to_string());
    }
}
