//! Error types for scene graph operations.

use thiserror::Error;

/// Errors raised by a [`crate::SceneGraph`] implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// A node with this name already exists. Node names are the only
    /// uniqueness mechanism the scene offers, so collisions are hard errors.
    #[error("a node named '{name}' already exists")]
    NameCollision { name: String },

    /// The referenced node does not exist (or was deleted).
    #[error("node '{node}' does not exist")]
    NodeNotFound { node: String },

    /// A connection destination is already driven and `force` was not set.
    #[error("'{node}.{attr}' is already driven by '{existing}'")]
    SlotAlreadyDriven {
        node: String,
        attr: String,
        existing: String,
    },

    /// A single-node query matched zero or more than one node. Callers of
    /// `find_single` assume uniqueness, so both cases are hard failures.
    #[error("query {predicate} matched {matches} node(s), expected exactly 1")]
    AmbiguousQuery { predicate: String, matches: usize },

    /// Evaluation requested an output the node kind does not produce.
    #[error("node '{node}' has no evaluable output '{attr}'")]
    UnsupportedPlug { node: String, attr: String },

    /// The connection network feeding a node forms a cycle.
    #[error("evaluation of '{node}' did not terminate (dependency cycle)")]
    EvaluationCycle { node: String },
}
