//! Validated identifiers: link identifiers and structured module names.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RigError;

fn link_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*(?:_[A-Za-z0-9]+)*$").unwrap())
}

fn type_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)*$").unwrap())
}

fn side_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]*$").unwrap())
}

/// A stable logical link name (e.g. `leg_L_2`) used to look up the
/// corresponding bind and driver joints across a chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkId(String);

impl LinkId {
    /// Creates a link identifier, validating its shape.
    pub fn new(value: impl Into<String>) -> Result<Self, RigError> {
        let value = value.into();
        if link_id_pattern().is_match(&value) {
            Ok(LinkId(value))
        } else {
            Err(RigError::InvalidIdentifier {
                what: "link identifier",
                value,
            })
        }
    }

    /// Builds a link identifier from a known-good pattern. Module type
    /// declarations use this for their generated identifier lists; the
    /// caller guarantees validity.
    pub(crate) fn new_unchecked(value: String) -> Self {
        debug_assert!(link_id_pattern().is_match(&value));
        LinkId(value)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LinkId {
    type Error = RigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LinkId::new(value)
    }
}

impl From<LinkId> for String {
    fn from(value: LinkId) -> Self {
        value.0
    }
}

/// Structured module identity: a registered type name plus an optional side
/// tag. The rendered instance name is `type_side` (or the bare type name
/// when unsided); all internal code carries the structured form and never
/// re-derives it from strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName {
    type_name: String,
    side: String,
}

impl ModuleName {
    /// Creates a module identity. The side tag may be empty.
    pub fn new(type_name: impl Into<String>, side: impl Into<String>) -> Result<Self, RigError> {
        let type_name = type_name.into();
        if !type_name_pattern().is_match(&type_name) {
            return Err(RigError::InvalidIdentifier {
                what: "module type name",
                value: type_name,
            });
        }
        let side = side.into();
        if !side_pattern().is_match(&side) {
            return Err(RigError::InvalidIdentifier {
                what: "module side tag",
                value: side,
            });
        }
        Ok(ModuleName { type_name, side })
    }

    /// The registered type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The side tag; empty for unsided modules.
    pub fn side(&self) -> &str {
        &self.side
    }

    /// The rendered instance name.
    pub fn instance(&self) -> String {
        if self.side.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}_{}", self.type_name, self.side)
        }
    }

    /// Generates a side-qualified link identifier: `prefix_side_index`, or
    /// `prefix_index` when unsided.
    pub fn link(&self, prefix: &str, index: usize) -> LinkId {
        if self.side.is_empty() {
            LinkId::new_unchecked(format!("{}_{}", prefix, index))
        } else {
            LinkId::new_unchecked(format!("{}_{}_{}", prefix, self.side, index))
        }
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_id_validation() {
        assert!(LinkId::new("leg_L_1").is_ok());
        assert!(LinkId::new("spine1").is_ok());
        assert!(LinkId::new("").is_err());
        assert!(LinkId::new("_leg").is_err());
        assert!(LinkId::new("leg__1").is_err());
        assert!(LinkId::new("leg L 1").is_err());
    }

    #[test]
    fn link_id_rejects_invalid_on_deserialize() {
        let ok: Result<LinkId, _> = serde_json::from_str("\"leg_L_1\"");
        assert!(ok.is_ok());
        let bad: Result<LinkId, _> = serde_json::from_str("\"leg__1\"");
        assert!(bad.is_err());
    }

    #[test]
    fn module_name_rendering() {
        let sided = ModuleName::new("human_leg", "L").unwrap();
        assert_eq!(sided.instance(), "human_leg_L");
        assert_eq!(sided.link("leg", 2).as_str(), "leg_L_2");

        let unsided = ModuleName::new("human_spine", "").unwrap();
        assert_eq!(unsided.instance(), "human_spine");
        assert_eq!(unsided.link("spine", 1).as_str(), "spine_1");
    }

    #[test]
    fn module_name_validation() {
        assert!(ModuleName::new("Human_Leg", "L").is_err());
        assert!(ModuleName::new("", "L").is_err());
        assert!(ModuleName::new("human_leg", "L R").is_err());
    }
}
