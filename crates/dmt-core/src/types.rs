//! # Data Type Catalog — Single Source of Truth
//!
//! Defines the closed set of data types a data model tree node may declare.
//! Containers (`object`, `array`) and primitive scalars are one tagged
//! enum, so every `match` on [`DataType`] is exhaustive. Adding a primitive
//! kind forces the validator, the example generator, the matcher and the
//! schema export to handle it at compile time.
//!
//! ## Naming
//!
//! Catalog names are lowercase (`"object"`, `"double"`, ...). Descriptor
//! input is matched case-insensitively via [`DataType::from_name`]; the
//! serde and `Display` forms are always the lowercase name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::DmtError;

/// Scalar value kinds that may appear as tree leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    /// `true` / `false`.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// IEEE 754 double precision.
    Double,
    /// UTF-8 text.
    String,
    /// RFC 3339 timestamp carried as a string.
    Date,
    /// Base64-encoded bytes carried as a string.
    Binary,
}

impl PrimitiveKind {
    /// Returns all primitive kinds in catalog order.
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            Self::Boolean,
            Self::Int,
            Self::Long,
            Self::Double,
            Self::String,
            Self::Date,
            Self::Binary,
        ]
    }

    /// Returns the lowercase catalog name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Date => "date",
            Self::Binary => "binary",
        }
    }

    /// Canonical example value used when rendering example messages.
    pub fn example(&self) -> Value {
        match self {
            Self::Boolean => json!(true),
            Self::Int => json!(42),
            Self::Long => json!(4_200_000_000_i64),
            Self::Double => json!(12.34),
            Self::String => json!("example"),
            Self::Date => json!("2021-06-01T12:00:00Z"),
            Self::Binary => json!("ZXhhbXBsZQ=="),
        }
    }
}

/// A data type from the catalog: a container or a primitive scalar.
///
/// The derived ordering (`Object < Array < Primitive(..)`) is only used to
/// sort-compare child type multisets; it carries no other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    /// Keyed container with at least one child.
    Object,
    /// Fixed-size container with exactly one child repeated `size` times.
    Array,
    /// Leaf scalar.
    Primitive(PrimitiveKind),
}

impl DataType {
    /// Every catalog entry, containers first.
    pub fn all() -> Vec<DataType> {
        let mut all = vec![Self::Object, Self::Array];
        all.extend(PrimitiveKind::all().iter().copied().map(Self::Primitive));
        all
    }

    /// Case-insensitive catalog lookup. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<DataType> {
        match name.to_ascii_lowercase().as_str() {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "boolean" => Some(Self::Primitive(PrimitiveKind::Boolean)),
            "int" => Some(Self::Primitive(PrimitiveKind::Int)),
            "long" => Some(Self::Primitive(PrimitiveKind::Long)),
            "double" => Some(Self::Primitive(PrimitiveKind::Double)),
            "string" => Some(Self::Primitive(PrimitiveKind::String)),
            "date" => Some(Self::Primitive(PrimitiveKind::Date)),
            "binary" => Some(Self::Primitive(PrimitiveKind::Binary)),
            _ => None,
        }
    }

    /// Returns the lowercase catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Primitive(kind) => kind.as_str(),
        }
    }

    /// True for scalar leaf types.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Example value for primitives; containers have none.
    pub fn example(&self) -> Option<Value> {
        match self {
            Self::Object | Self::Array => None,
            Self::Primitive(kind) => Some(kind.example()),
        }
    }

    /// The JSON Schema `type` keyword for values of this type.
    pub fn json_schema_type(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Primitive(PrimitiveKind::Boolean) => "boolean",
            Self::Primitive(PrimitiveKind::Int | PrimitiveKind::Long) => "integer",
            Self::Primitive(PrimitiveKind::Double) => "number",
            Self::Primitive(PrimitiveKind::String | PrimitiveKind::Date | PrimitiveKind::Binary) => {
                "string"
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = DmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DmtError::UnknownType(s.to_string()))
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown data type: {raw:?}")))
    }
}
