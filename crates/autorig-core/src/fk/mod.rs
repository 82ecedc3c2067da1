//! Forward-kinematics chain construction.
//!
//! Given an ordered list of link identifiers, the builder emits one node set
//! per link (guide locator, control, FK joint, plus the aim-support set) and
//! wires a constraint network whose accumulated matrix products give every
//! control a deterministic, hierarchy-independent orientation: each link's
//! frame is solved from two aim targets, and its final transform is the
//! product of its own orientation correction with every predecessor's.
//!
//! Link order is load-bearing. Wiring reads the *immediately preceding*
//! link's outputs, so links must be processed in identifier-list order.

mod chain;

pub use chain::{build_fk_chain, parent_chain_nodes};

use autorig_scene::{NodeId, SceneError, SceneGraph};
use thiserror::Error;

use crate::error::RigError;
use crate::ids::LinkId;

/// Which way along the local X axis a chain aims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimDirection {
    /// Aim along +X.
    #[default]
    Positive,
    /// Aim along -X.
    Negative,
}

impl AimDirection {
    /// The axis sign written into each aim solver.
    pub fn sign(self) -> f64 {
        match self {
            AimDirection::Positive => 1.0,
            AimDirection::Negative => -1.0,
        }
    }
}

/// Options for [`build_fk_chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FkChainParams {
    /// Aim-direction sign for every link's orientation solver.
    pub aim_direction: AimDirection,
    /// Whether the terminal link keeps a usable control. When false, the
    /// terminal link's generated nodes are deleted after wiring; its
    /// creation is still required to seed the previous link's accumulators.
    pub keep_end_control: bool,
}

impl Default for FkChainParams {
    fn default() -> Self {
        FkChainParams {
            aim_direction: AimDirection::Positive,
            keep_end_control: true,
        }
    }
}

/// The aim-support node set of a link. Populated by the aim-augmentation
/// step; a link record without it is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FkAimNodes {
    /// Aim target the solver points the chain axis at.
    pub primary_target: NodeId,
    /// Up-hint target disambiguating roll.
    pub secondary_target: NodeId,
    /// Aim-orientation solver.
    pub aim_matrix: NodeId,
    /// Inverse of the solver output, consumed by the successor link.
    pub aim_inverse: NodeId,
    /// Accumulator chaining this link's correction with its predecessor's.
    pub parent_offset_product: NodeId,
    /// Accumulator producing the control's final world transform.
    pub world_product: NodeId,
}

/// One joint's worth of FK rigging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkLink {
    /// The logical identifier this link was built for.
    pub link: LinkId,
    /// Guide locator authoring the link's rest position.
    pub guide_locator: NodeId,
    /// The animator-facing control.
    pub control: NodeId,
    /// Pre-existing skeleton joint (looked up, not created).
    pub bind_joint: NodeId,
    /// Pre-existing driver joint (looked up, not created).
    pub driver_joint: NodeId,
    /// Output joint driven by the control.
    pub fk_joint: NodeId,
    /// Aim-support nodes; `None` only before augmentation.
    pub aim: Option<FkAimNodes>,
}

/// A built chain: the shared root locator plus the ordered, possibly pruned
/// link records. Index order equals the order of identifiers supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkChain {
    /// Root locator; world position matches the first link's driver joint.
    pub root: NodeId,
    /// Completed link records in identifier order.
    pub links: Vec<FkLink>,
}

/// A failed chain build.
///
/// Construction is not atomic: nodes created before the failure stay in the
/// scene. The error carries the transcript of everything the builder
/// created so callers wanting atomicity can discard the partial build
/// explicitly (see [`discard_partial`]).
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ChainBuildError {
    #[source]
    source: RigError,
    created: Vec<NodeId>,
}

impl ChainBuildError {
    pub(crate) fn new(source: RigError, created: Vec<NodeId>) -> Self {
        ChainBuildError { source, created }
    }

    /// The underlying failure.
    pub fn error(&self) -> &RigError {
        &self.source
    }

    /// Every node the failed build created, in creation order.
    pub fn created_nodes(&self) -> &[NodeId] {
        &self.created
    }
}

impl From<ChainBuildError> for RigError {
    fn from(err: ChainBuildError) -> Self {
        err.source
    }
}

/// Deletes every node a failed chain build created. Nodes already gone are
/// skipped.
pub fn discard_partial(
    scene: &mut dyn SceneGraph,
    err: &ChainBuildError,
) -> Result<(), SceneError> {
    let live: Vec<NodeId> = err
        .created_nodes()
        .iter()
        .copied()
        .filter(|&n| scene.exists(n))
        .collect();
    scene.delete(&live)
}
