//! The FK control chain feature.

use autorig_scene::{plugs, AttrValue, NodeId, SceneGraph};

use crate::error::{JointRole, RigError};
use crate::feature::Feature;
use crate::fk::{build_fk_chain, parent_chain_nodes, FkChainParams};
use crate::ids::{LinkId, ModuleName};
use crate::setup::find_joint;
use crate::tags::{attr, feature_predicate, feature_type};

/// Forward-kinematics control chain over a module's identifier sublist.
pub struct FkFeature;

impl Feature for FkFeature {
    fn name(&self) -> &'static str {
        "fk"
    }

    /// Builds the chain and reorganizes its nodes into the module's
    /// containers. A failed build is surfaced as-is; nodes created before
    /// the failure stay in the scene for the caller to deal with.
    fn create(
        &self,
        module: &ModuleName,
        scene: &mut dyn SceneGraph,
        ids: &[LinkId],
    ) -> Result<(), RigError> {
        let chain = build_fk_chain(scene, module, ids, FkChainParams::default())?;
        parent_chain_nodes(scene, module, &chain)
    }

    /// Drives the module's driver joints from the chain: each FK joint's
    /// world transform force-connects into the driver joint sharing its link
    /// identifier. A pruned terminal link has no FK joint and is skipped
    /// naturally.
    fn attach(&self, module: &ModuleName, scene: &mut dyn SceneGraph) -> Result<(), RigError> {
        let fk_joints: Vec<NodeId> =
            scene.find_all(&feature_predicate(module, feature_type::FK_JOINT));
        for fk_joint in fk_joints {
            let raw = scene
                .get_attr(fk_joint, attr::JOINT_ID)?
                .and_then(AttrValue::as_str)
                .map(str::to_string);
            let link = match raw {
                Some(raw) => LinkId::new(raw)?,
                None => {
                    return Err(RigError::Configuration(format!(
                        "FK joint '{}' carries no link identifier",
                        scene.node_name(fk_joint)?
                    )))
                }
            };
            let driver = find_joint(scene, &link, JointRole::Driver)?;
            scene.connect(
                fk_joint,
                plugs::WORLD_MATRIX,
                driver,
                plugs::OFFSET_PARENT_MATRIX,
                true,
            )?;
        }
        Ok(())
    }

    /// Deletes every node this feature generated for the module.
    fn remove(&self, module: &ModuleName, scene: &mut dyn SceneGraph) -> Result<(), RigError> {
        for tag in feature_type::ALL_FK {
            let doomed = scene.find_all(&feature_predicate(module, tag));
            if !doomed.is_empty() {
                scene.delete(&doomed)?;
            }
        }
        Ok(())
    }
}
