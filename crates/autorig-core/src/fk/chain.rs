//! The chain builder and chain parenting.

use autorig_scene::{
    kinds, plugs, AttrMap, AttrValue, MatchMode, NodeId, SceneGraph,
};
use glam::DVec3;

use super::{ChainBuildError, FkAimNodes, FkChain, FkChainParams, FkLink};
use crate::error::{JointRole, RigError};
use crate::ids::{LinkId, ModuleName};
use crate::setup::{find_container, find_joint, hide_node};
use crate::tags::{attr, feature_type, node_tags};

/// Axis of the aim solver's roll disambiguation. The secondary aim target
/// sits one unit along this axis from the primary, in the driver joint's
/// local frame.
const UP_AXIS: DVec3 = DVec3::Y;

/// Builds an FK chain for an ordered, non-empty identifier list.
///
/// Nodes already created when a lookup fails are not rolled back; the
/// returned [`ChainBuildError`] carries their handles for explicit cleanup.
pub fn build_fk_chain(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    ids: &[LinkId],
    params: FkChainParams,
) -> Result<FkChain, ChainBuildError> {
    let mut builder = ChainBuilder {
        scene,
        module,
        created: Vec::new(),
    };
    match builder.build(ids, params) {
        Ok(chain) => Ok(chain),
        Err(source) => Err(ChainBuildError::new(source, builder.created)),
    }
}

struct ChainBuilder<'a> {
    scene: &'a mut dyn SceneGraph,
    module: &'a ModuleName,
    created: Vec<NodeId>,
}

impl ChainBuilder<'_> {
    fn build(&mut self, ids: &[LinkId], params: FkChainParams) -> Result<FkChain, RigError> {
        if ids.is_empty() {
            return Err(RigError::Configuration(
                "an FK chain requires at least one link identifier".to_string(),
            ));
        }

        let root = self.create_root(&ids[0])?;

        let mut links = Vec::with_capacity(ids.len());
        for link in ids {
            let mut record = self.create_link(link)?;
            self.augment_with_aim_nodes(&mut record, root)?;
            links.push(record);
        }

        for i in 0..links.len() {
            let (before, rest) = links.split_at(i);
            self.wire_link(root, &rest[0], before.last(), params.aim_direction.sign())?;
        }

        if !params.keep_end_control {
            self.prune_terminal(&mut links)?;
        }

        Ok(FkChain { root, links })
    }

    /// Root setup: the root locator is authored relative to the module root
    /// through its offset-parent plug rather than reparented, so later scene
    /// organization cannot disturb transforms. Translation (not rotation)
    /// matches the first identifier's driver joint.
    fn create_root(&mut self, first: &LinkId) -> Result<NodeId, RigError> {
        let root = self.locator(
            format!("{}_fk_root", first),
            node_tags(self.module, feature_type::FK_ROOT),
        )?;
        let driver = find_joint(self.scene, first, JointRole::Driver)?;
        let module_root = self
            .scene
            .find_single(&node_tags(self.module, feature_type::MODULE_ROOT))?;

        self.scene.connect(
            module_root,
            plugs::WORLD_MATRIX,
            root,
            plugs::OFFSET_PARENT_MATRIX,
            false,
        )?;
        self.scene
            .match_transform(root, driver, MatchMode::PositionOnly)?;
        Ok(root)
    }

    /// Creates a link's base node set. Bind and driver joints are looked up
    /// first; a missing joint fails the build before this link creates
    /// anything.
    fn create_link(&mut self, link: &LinkId) -> Result<FkLink, RigError> {
        let bind_joint = find_joint(self.scene, link, JointRole::Bind)?;
        let driver_joint = find_joint(self.scene, link, JointRole::Driver)?;

        let guide_locator = self.locator(
            format!("{}_fk_guide", link),
            node_tags(self.module, feature_type::FK_GUIDE),
        )?;

        let mut control_tags = node_tags(self.module, feature_type::FK_CONTROL);
        control_tags.insert(attr::CONTROL_ID.to_string(), AttrValue::from(link.as_str()));
        let control = self.curve(format!("{}_fk_ctrl", link), control_tags)?;

        let mut joint_tags = node_tags(self.module, feature_type::FK_JOINT);
        joint_tags.insert(attr::JOINT_ID.to_string(), AttrValue::from(link.as_str()));
        let fk_joint = self.node(kinds::JOINT, format!("{}_fk_joint", link), joint_tags)?;

        self.scene
            .match_transform(guide_locator, bind_joint, MatchMode::PositionOnly)?;
        hide_node(self.scene, guide_locator)?;
        self.scene
            .set_attr_flags(control, attr::VISIBILITY, false, false)?;

        // Provisional drive; the wiring pass overrides it with the solved
        // orientation network.
        self.scene.connect(
            guide_locator,
            plugs::WORLD_MATRIX,
            control,
            plugs::OFFSET_PARENT_MATRIX,
            false,
        )?;
        self.scene.connect(
            control,
            plugs::WORLD_MATRIX,
            fk_joint,
            plugs::OFFSET_PARENT_MATRIX,
            false,
        )?;

        hide_node(self.scene, fk_joint)?;
        self.scene
            .set_attr(driver_joint, attr::VISIBILITY, AttrValue::from(false))?;

        Ok(FkLink {
            link: link.clone(),
            guide_locator,
            control,
            bind_joint,
            driver_joint,
            fk_joint,
            aim: None,
        })
    }

    /// Aim augmentation: two aim targets, the orientation solver, its
    /// inverse, and the two matrix accumulators. The primary target sits at
    /// the driver joint; the secondary sits one unit along the canonical
    /// perpendicular axis from the same point, which disambiguates aim and
    /// roll without reading any parent rotation.
    fn augment_with_aim_nodes(
        &mut self,
        record: &mut FkLink,
        root: NodeId,
    ) -> Result<(), RigError> {
        let link = record.link.clone();

        let aim_matrix = self.node(
            kinds::AIM_MATRIX,
            format!("{}_fk_ctrl_aim", link),
            node_tags(self.module, feature_type::FK_AIM_MATRIX),
        )?;
        let aim_inverse = self.node(
            kinds::INVERSE_MATRIX,
            format!("{}_fk_ctrl_aim_inverse", link),
            node_tags(self.module, feature_type::FK_AIM_INVERSE),
        )?;
        let primary_target = self.locator(
            format!("{}_fk_primary_aim", link),
            node_tags(self.module, feature_type::FK_PRIMARY_AIM),
        )?;
        let secondary_target = self.locator(
            format!("{}_fk_secondary_aim", link),
            node_tags(self.module, feature_type::FK_SECONDARY_AIM),
        )?;
        let parent_offset_product = self.node(
            kinds::MULT_MATRIX,
            format!("{}_fk_ctrl_parent_offset", link),
            node_tags(self.module, feature_type::FK_PARENT_OFFSET),
        )?;
        let world_product = self.node(
            kinds::MULT_MATRIX,
            format!("{}_fk_ctrl_world", link),
            node_tags(self.module, feature_type::FK_WORLD),
        )?;

        hide_node(self.scene, primary_target)?;
        hide_node(self.scene, secondary_target)?;

        for target in [primary_target, secondary_target] {
            self.scene.connect(
                root,
                plugs::WORLD_MATRIX,
                target,
                plugs::OFFSET_PARENT_MATRIX,
                false,
            )?;
        }
        self.scene
            .match_transform(primary_target, record.driver_joint, MatchMode::Full)?;
        self.scene
            .match_transform(secondary_target, record.driver_joint, MatchMode::Full)?;
        self.scene.offset_local_translation(secondary_target, UP_AXIS)?;

        record.aim = Some(FkAimNodes {
            primary_target,
            secondary_target,
            aim_matrix,
            aim_inverse,
            parent_offset_product,
            world_product,
        });
        Ok(())
    }

    /// Wires one link. Processing order matters: each link reads its
    /// immediate predecessor's inverse-solver output and control transform,
    /// which is how every control's final orientation accumulates all
    /// ancestor corrections without scene-hierarchy inheritance.
    fn wire_link(
        &mut self,
        root: NodeId,
        current: &FkLink,
        previous: Option<&FkLink>,
        aim_sign: f64,
    ) -> Result<(), RigError> {
        let aim = current.aim.as_ref().ok_or_else(|| {
            RigError::Configuration(format!(
                "link '{}' was not aim-augmented before wiring",
                current.link
            ))
        })?;

        self.scene.connect(
            root,
            plugs::WORLD_MATRIX,
            current.guide_locator,
            plugs::OFFSET_PARENT_MATRIX,
            false,
        )?;
        self.scene
            .match_transform(current.guide_locator, current.driver_joint, MatchMode::Full)?;

        self.scene.connect(
            current.guide_locator,
            plugs::WORLD_MATRIX,
            aim.aim_matrix,
            plugs::INPUT_MATRIX,
            false,
        )?;
        self.scene
            .set_attr(aim.aim_matrix, "primary_axis_x", AttrValue::from(aim_sign))?;
        self.scene
            .set_attr(aim.aim_matrix, "secondary_axis_y", AttrValue::from(1.0))?;

        self.scene.connect(
            aim.aim_matrix,
            plugs::OUTPUT_MATRIX,
            aim.aim_inverse,
            plugs::INPUT_MATRIX,
            false,
        )?;
        self.scene.connect(
            aim.primary_target,
            plugs::WORLD_MATRIX,
            aim.aim_matrix,
            plugs::PRIMARY_TARGET_MATRIX,
            false,
        )?;
        self.scene.connect(
            aim.secondary_target,
            plugs::WORLD_MATRIX,
            aim.aim_matrix,
            plugs::SECONDARY_TARGET_MATRIX,
            false,
        )?;

        // Provisional: the solver drives the control directly until the
        // accumulator network takes final authority below.
        self.scene.connect(
            aim.aim_matrix,
            plugs::OUTPUT_MATRIX,
            current.control,
            plugs::OFFSET_PARENT_MATRIX,
            true,
        )?;

        if let Some(previous) = previous {
            let prev_aim = previous.aim.as_ref().ok_or_else(|| {
                RigError::Configuration(format!(
                    "link '{}' was not aim-augmented before wiring",
                    previous.link
                ))
            })?;
            self.scene.connect(
                prev_aim.aim_inverse,
                plugs::OUTPUT_MATRIX,
                aim.parent_offset_product,
                &plugs::matrix_in(1),
                false,
            )?;
            self.scene.connect(
                previous.control,
                plugs::WORLD_MATRIX,
                aim.world_product,
                &plugs::matrix_in(1),
                false,
            )?;
        }

        self.scene.connect(
            aim.aim_matrix,
            plugs::OUTPUT_MATRIX,
            aim.parent_offset_product,
            &plugs::matrix_in(0),
            false,
        )?;
        self.scene.connect(
            aim.parent_offset_product,
            plugs::MATRIX_SUM,
            aim.world_product,
            &plugs::matrix_in(0),
            false,
        )?;
        self.scene.connect(
            aim.world_product,
            plugs::MATRIX_SUM,
            current.control,
            plugs::OFFSET_PARENT_MATRIX,
            true,
        )?;
        Ok(())
    }

    /// Terminal pruning: nothing in the chain reads from the terminal link's
    /// outputs (wiring only flows predecessor to successor), so its control,
    /// FK joint, guide, and both aim targets can be deleted once wiring has
    /// seeded the previous link's accumulators. The terminal link's matrix
    /// nodes stay behind.
    fn prune_terminal(&mut self, links: &mut Vec<FkLink>) -> Result<(), RigError> {
        let terminal = match links.pop() {
            Some(link) => link,
            None => return Ok(()),
        };
        let mut doomed = vec![terminal.control, terminal.fk_joint, terminal.guide_locator];
        if let Some(aim) = &terminal.aim {
            doomed.push(aim.primary_target);
            doomed.push(aim.secondary_target);
        }
        self.scene.delete(&doomed)?;
        Ok(())
    }

    fn node(&mut self, kind: &str, name: String, tags: AttrMap) -> Result<NodeId, RigError> {
        let name = self.unique_name(name);
        let id = self.scene.create_node(kind, &name, tags)?;
        self.created.push(id);
        Ok(id)
    }

    fn locator(&mut self, name: String, tags: AttrMap) -> Result<NodeId, RigError> {
        let name = self.unique_name(name);
        let id = self.scene.create_locator(&name, tags)?;
        self.created.push(id);
        Ok(id)
    }

    fn curve(&mut self, name: String, tags: AttrMap) -> Result<NodeId, RigError> {
        let name = self.unique_name(name);
        let id = self.scene.create_placeholder_curve(&name, tags)?;
        self.created.push(id);
        Ok(id)
    }

    /// Picks an unused node name: the base when free, otherwise the first
    /// numbered variant. Rebuilding a chain over an existing one therefore
    /// yields a second, independent node set instead of a name collision.
    fn unique_name(&self, base: String) -> String {
        if self.scene.node_by_name(&base).is_none() {
            return base;
        }
        let mut counter = 1u32;
        loop {
            let candidate = format!("{}{}", base, counter);
            if self.scene.node_by_name(&candidate).is_none() {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Reorganizes a built chain into the module's containers: guides and aim
/// targets under the guide group, FK joints under the joint group, controls
/// under the control group, and the root locator under the guide group once.
/// Purely organizational; transforms are unaffected.
pub fn parent_chain_nodes(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    chain: &FkChain,
) -> Result<(), RigError> {
    let guide_group = find_container(scene, module, feature_type::GUIDE_GROUP)?;
    let joint_group = find_container(scene, module, feature_type::JOINT_GROUP)?;
    let control_group = find_container(scene, module, feature_type::CONTROL_GROUP)?;

    scene.reparent(&[chain.root], guide_group)?;
    for link in &chain.links {
        let mut guides = vec![link.guide_locator];
        if let Some(aim) = &link.aim {
            guides.push(aim.primary_target);
            guides.push(aim.secondary_target);
        }
        scene.reparent(&guides, guide_group)?;
        scene.reparent(&[link.fk_joint], joint_group)?;
        scene.reparent(&[link.control], control_group)?;
    }
    Ok(())
}
