//! Error and warning types for rig construction.

use std::fmt;

use autorig_scene::SceneError;
use thiserror::Error;

/// Which joint role a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointRole {
    /// Skeleton joint the rig binds to; must pre-exist in the scene.
    Bind,
    /// Intermediate joint the rig drives; created by `create_module`.
    Driver,
}

impl fmt::Display for JointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointRole::Bind => write!(f, "bind"),
            JointRole::Driver => write!(f, "driver"),
        }
    }
}

/// Fatal errors raised by the module/feature layer.
#[derive(Debug, Error)]
pub enum RigError {
    /// A module type declaration is malformed (empty type name, duplicate
    /// feature names, double registration). Raised at registration time,
    /// never per instance.
    #[error("invalid module type declaration: {0}")]
    Configuration(String),

    /// No module type with this name has been registered. Deliberately
    /// distinct from scene-level "not found" conditions so callers can tell
    /// "unknown module type" from "module not present in the scene".
    #[error("module type '{type_name}' is not registered")]
    NotRegistered { type_name: String },

    /// A required bind or driver joint is absent for a link identifier.
    /// Fatal to the current operation; nodes created earlier in the same
    /// call are not rolled back.
    #[error("no {role} joint in the scene matches '{link}'")]
    MissingJoint { link: String, role: JointRole },

    /// An identifier failed validation.
    #[error("invalid {what}: '{value}'")]
    InvalidIdentifier { what: &'static str, value: String },

    /// A scene graph operation failed.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Non-fatal conditions reported to the caller.
///
/// Warnings never mutate the scene. They are returned as values and also
/// emitted through [`log::warn!`] by the operation that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigWarning {
    /// A requested feature name is not supported by the module type.
    UnsupportedFeature {
        module_type: String,
        feature: String,
    },
    /// A module connection was refused by an `allow_input`/`allow_output`
    /// flag.
    ConnectionNotAllowed { module: String, reason: String },
}

impl RigWarning {
    /// Stable warning code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            RigWarning::UnsupportedFeature { .. } => "W001",
            RigWarning::ConnectionNotAllowed { .. } => "W002",
        }
    }
}

impl fmt::Display for RigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigWarning::UnsupportedFeature {
                module_type,
                feature,
            } => write!(
                f,
                "{}: feature '{}' is not supported by the '{}' module type",
                self.code(),
                feature,
                module_type
            ),
            RigWarning::ConnectionNotAllowed { module, reason } => {
                write!(f, "{}: connection refused by '{}': {}", self.code(), module, reason)
            }
        }
    }
}
