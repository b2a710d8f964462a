//! # Compiled JSON Paths
//!
//! Every tree node carries the path from the document root to the values it
//! describes. The path is symbolic at schema level: an array element step is
//! the wildcard `[*]`, to be instantiated with concrete indices only when a
//! consumer extracts values from a real payload.
//!
//! ## Syntax
//!
//! ```text
//! temperature              field of the document root
//! env.humidity             nested field
//! samples[*]               element of array `samples`
//! samples[*][*].value      field inside a 2-D array element
//! ['unit.name'].x          field names outside [A-Za-z0-9_-] are quoted
//! samples[3]               concrete (instantiated) index
//! ```
//!
//! The document root itself is the empty path and renders as `""`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::DmtError;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member access by key.
    Field(String),
    /// Any element of an array (symbolic, schema level).
    AnyIndex,
    /// A concrete array element.
    Index(usize),
}

/// A structured root-to-node path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The empty path (document root).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// This path extended by an object member.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self { segments }
    }

    /// This path extended by a symbolic array element step.
    pub fn element(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::AnyIndex);
        Self { segments }
    }

    /// True for the empty path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The steps of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of symbolic `[*]` steps.
    pub fn array_depth(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::AnyIndex))
            .count()
    }

    /// Replace the symbolic `[*]` steps, left to right, with concrete indices.
    ///
    /// # Errors
    ///
    /// Returns `DmtError::InvalidPath` if `indices.len()` differs from
    /// [`array_depth`](Self::array_depth).
    pub fn instantiate(&self, indices: &[usize]) -> Result<JsonPath, DmtError> {
        if indices.len() != self.array_depth() {
            return Err(DmtError::InvalidPath(format!(
                "{self} has {} array steps, got {} indices",
                self.array_depth(),
                indices.len()
            )));
        }
        let mut next = indices.iter();
        let segments = self
            .segments
            .iter()
            .map(|s| match s {
                PathSegment::AnyIndex => next
                    .next()
                    .map(|i| PathSegment::Index(*i))
                    .unwrap_or(PathSegment::AnyIndex),
                other => other.clone(),
            })
            .collect();
        Ok(Self { segments })
    }

    /// Evaluate the path against a document. Wildcards select every element;
    /// missing members or out-of-range indices select nothing.
    pub fn select<'v>(&self, document: &'v Value) -> Vec<&'v Value> {
        let mut current = vec![document];
        for segment in &self.segments {
            let mut next = Vec::new();
            for value in current {
                match (segment, value) {
                    (PathSegment::Field(name), Value::Object(map)) => {
                        next.extend(map.get(name));
                    }
                    (PathSegment::AnyIndex, Value::Array(items)) => next.extend(items.iter()),
                    (PathSegment::Index(i), Value::Array(items)) => next.extend(items.get(*i)),
                    _ => {}
                }
            }
            current = next;
        }
        current
    }
}

fn is_plain_field(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if is_plain_field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Field(name) => {
                    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
                    write!(f, "['{escaped}']")?;
                }
                PathSegment::AnyIndex => f.write_str("[*]")?,
                PathSegment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = DmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| DmtError::InvalidPath(format!("{s:?}: {why}"));
        let chars: Vec<char> = s.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '[' => {
                    i += 1;
                    match chars.get(i) {
                        Some('*') => {
                            if chars.get(i + 1) != Some(&']') {
                                return Err(invalid("unterminated [*]"));
                            }
                            segments.push(PathSegment::AnyIndex);
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            let mut name = String::new();
                            loop {
                                match chars.get(i) {
                                    Some('\\') => {
                                        let escaped =
                                            chars.get(i + 1).ok_or_else(|| invalid("dangling escape"))?;
                                        name.push(*escaped);
                                        i += 2;
                                    }
                                    Some('\'') => break,
                                    Some(c) => {
                                        name.push(*c);
                                        i += 1;
                                    }
                                    None => return Err(invalid("unterminated quoted field")),
                                }
                            }
                            if chars.get(i + 1) != Some(&']') {
                                return Err(invalid("expected ] after quoted field"));
                            }
                            segments.push(PathSegment::Field(name));
                            i += 2;
                        }
                        Some(c) if c.is_ascii_digit() => {
                            let start = i;
                            while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                                i += 1;
                            }
                            if chars.get(i) != Some(&']') {
                                return Err(invalid("unterminated index"));
                            }
                            let digits: String = chars[start..i].iter().collect();
                            let n = digits.parse().map_err(|_| invalid("index out of range"))?;
                            segments.push(PathSegment::Index(n));
                            i += 1;
                        }
                        _ => return Err(invalid("unexpected bracket content")),
                    }
                }
                '.' => {
                    if segments.is_empty() {
                        return Err(invalid("leading dot"));
                    }
                    i += 1;
                    if !chars.get(i).is_some_and(|c| is_plain_char(*c)) {
                        return Err(invalid("empty field after dot"));
                    }
                    i = read_plain(&chars, i, &mut segments);
                }
                c if is_plain_char(c) && segments.is_empty() => {
                    i = read_plain(&chars, i, &mut segments);
                }
                _ => return Err(invalid("unexpected character")),
            }
        }
        Ok(Self { segments })
    }
}

impl serde::Serialize for JsonPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for JsonPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn is_plain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn read_plain(chars: &[char], mut i: usize, segments: &mut Vec<PathSegment>) -> usize {
    let start = i;
    while chars.get(i).is_some_and(|c| is_plain_char(*c)) {
        i += 1;
    }
    segments.push(PathSegment::Field(chars[start..i].iter().collect()));
    i
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = PathSegment> {
        prop_oneof![
            "[a-z_][a-z0-9_-]{0,8}".prop_map(PathSegment::Field),
            // Names with dots, quotes, brackets and backslashes need quoting.
            "[a-z.'\\[\\]\\\\ ]{0,6}".prop_map(PathSegment::Field),
            Just(PathSegment::AnyIndex),
            (0usize..1000).prop_map(PathSegment::Index),
        ]
    }

    proptest! {
        /// Any field name survives rendering and parsing unchanged.
        #[test]
        fn rendered_paths_parse_back(segments in prop::collection::vec(segment(), 0..6)) {
            let path = JsonPath::from_segments(segments);
            let parsed: JsonPath = path.to_string().parse().unwrap();
            prop_assert_eq!(parsed, path);
        }
    }
}
