//! Attribute values and attribute bags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Scene attributes are scalars or strings; matrices are never stored as
/// attribute values, they are produced by evaluation (see
/// [`crate::MemoryScene`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// String value (tags, references).
    String(String),
}

impl AttrValue {
    /// Returns the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an f64 (ints widen, bools do not).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// An attribute bag: attribute name to value, ordered for deterministic
/// iteration and dumps.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// Builds an [`AttrMap`] from name/value pairs.
pub fn attr_map<V: Into<AttrValue>, const N: usize>(pairs: [(&str, V); N]) -> AttrMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into()))
        .collect()
}
