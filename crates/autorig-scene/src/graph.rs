//! The scene graph service contract.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::attr::{AttrMap, AttrValue};
use crate::error::SceneError;

/// Opaque handle to a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw index of this handle, for diagnostics only.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// How much of a transform `match_transform` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Copy the full world transform (translation and rotation).
    Full,
    /// Copy world translation only; rotation is left untouched.
    PositionOnly,
}

/// Well-known node kinds.
///
/// Kinds are open-ended strings; these are the ones rig construction creates
/// and the reference evaluator understands.
pub mod kinds {
    /// Plain transform, used for organizational containers.
    pub const TRANSFORM: &str = "transform";
    /// Point-in-space marker.
    pub const LOCATOR: &str = "locator";
    /// Skeleton joint.
    pub const JOINT: &str = "joint";
    /// Placeholder curve shape standing in for a control.
    pub const CURVE: &str = "curve";
    /// Aim-orientation solver: derives a frame from two target directions.
    pub const AIM_MATRIX: &str = "aim_matrix";
    /// Matrix inverse of its input.
    pub const INVERSE_MATRIX: &str = "inverse_matrix";
    /// Ordered matrix product over its input slots.
    pub const MULT_MATRIX: &str = "mult_matrix";
}

/// Well-known connection plug names.
pub mod plugs {
    /// Evaluated world transform of a transform-bearing node (output).
    pub const WORLD_MATRIX: &str = "world_matrix";
    /// Authored-space override of a transform-bearing node (input). Driving
    /// this plug decouples transform inheritance from scene-hierarchy
    /// parenting.
    pub const OFFSET_PARENT_MATRIX: &str = "offset_parent_matrix";
    /// Input transform of an aim or inverse matrix node.
    pub const INPUT_MATRIX: &str = "input_matrix";
    /// Evaluated output of an aim or inverse matrix node.
    pub const OUTPUT_MATRIX: &str = "output_matrix";
    /// Primary aim target input of an aim matrix node.
    pub const PRIMARY_TARGET_MATRIX: &str = "primary_target_matrix";
    /// Secondary (up-hint) target input of an aim matrix node.
    pub const SECONDARY_TARGET_MATRIX: &str = "secondary_target_matrix";
    /// Evaluated product of a mult matrix node.
    pub const MATRIX_SUM: &str = "matrix_sum";

    /// Indexed input slot of a mult matrix node. Slot 0 is applied first.
    pub fn matrix_in(slot: usize) -> String {
        format!("matrix_in[{}]", slot)
    }
}

/// The scene graph service.
///
/// All rig construction is expressed against this trait. Operations are
/// synchronous, single-threaded scene mutations; ordering between calls is
/// load-bearing and there is no rollback — callers own cleanup of partial
/// edits.
pub trait SceneGraph {
    /// Creates a typed node with a unique name and an attribute bag.
    fn create_node(&mut self, kind: &str, name: &str, attrs: AttrMap)
        -> Result<NodeId, SceneError>;

    /// Creates a locator node.
    fn create_locator(&mut self, name: &str, attrs: AttrMap) -> Result<NodeId, SceneError> {
        self.create_node(kinds::LOCATOR, name, attrs)
    }

    /// Creates a placeholder curve-shaped node standing in for a control.
    fn create_placeholder_curve(
        &mut self,
        name: &str,
        attrs: AttrMap,
    ) -> Result<NodeId, SceneError> {
        self.create_node(kinds::CURVE, name, attrs)
    }

    /// Returns the node's unique name.
    fn node_name(&self, node: NodeId) -> Result<&str, SceneError>;

    /// Resolves a live node by its unique name.
    fn node_by_name(&self, name: &str) -> Option<NodeId>;

    /// Whether the node exists (has not been deleted).
    fn exists(&self, node: NodeId) -> bool;

    /// Connects `src.src_attr` to `dst.dst_attr`. If the destination is
    /// already driven the call fails unless `force` is set, in which case the
    /// existing connection is replaced.
    fn connect(
        &mut self,
        src: NodeId,
        src_attr: &str,
        dst: NodeId,
        dst_attr: &str,
        force: bool,
    ) -> Result<(), SceneError>;

    /// Returns the plug currently driving `dst.dst_attr`, if any.
    fn connection_source(&self, dst: NodeId, dst_attr: &str) -> Option<(NodeId, String)>;

    /// Sets an attribute value, creating the attribute if absent.
    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<(), SceneError>;

    /// Reads an attribute value.
    fn get_attr(&self, node: NodeId, attr: &str) -> Result<Option<&AttrValue>, SceneError>;

    /// Sets channel-box display flags for an attribute.
    fn set_attr_flags(
        &mut self,
        node: NodeId,
        attr: &str,
        keyable: bool,
        channel_box: bool,
    ) -> Result<(), SceneError>;

    /// Matches `node`'s world transform to `target`'s.
    fn match_transform(
        &mut self,
        node: NodeId,
        target: NodeId,
        mode: MatchMode,
    ) -> Result<(), SceneError>;

    /// Translates a node by `delta` in its local frame.
    fn offset_local_translation(&mut self, node: NodeId, delta: DVec3) -> Result<(), SceneError>;

    /// Finds the single node whose attributes contain every entry of
    /// `predicate`. Zero or multiple matches fail with
    /// [`SceneError::AmbiguousQuery`].
    fn find_single(&self, predicate: &AttrMap) -> Result<NodeId, SceneError>;

    /// Finds all nodes whose attributes contain every entry of `predicate`.
    fn find_all(&self, predicate: &AttrMap) -> Vec<NodeId>;

    /// Finds all nodes carrying an attribute of the given name, regardless of
    /// its value.
    fn find_all_with_attr(&self, attr: &str) -> Vec<NodeId>;

    /// Deletes the given nodes and every connection touching them.
    fn delete(&mut self, nodes: &[NodeId]) -> Result<(), SceneError>;

    /// Reparents nodes under `parent` for scene organization. Purely
    /// structural: world transforms are not affected.
    fn reparent(&mut self, nodes: &[NodeId], parent: NodeId) -> Result<(), SceneError>;
}
