//! Module scaffolding: container groups, driver joints, and the module root
//! guide.
//!
//! The creation sequence is strictly ordered: containers must exist before
//! driver joints are parented into them, and driver joints must exist before
//! any feature can query them.

use autorig_scene::{kinds, AttrMap, AttrValue, MatchMode, NodeId, SceneGraph};

use crate::error::{JointRole, RigError};
use crate::ids::{LinkId, ModuleName};
use crate::tags::{attr, feature_type, node_tags};

/// Looks up the joint for a link identifier in the given role.
///
/// Zero matches is a [`RigError::MissingJoint`]; more than one is an
/// ambiguity defect and fails through the scene's exactly-one contract.
pub fn find_joint(
    scene: &dyn SceneGraph,
    link: &LinkId,
    role: JointRole,
) -> Result<NodeId, RigError> {
    let tag = match role {
        JointRole::Bind => feature_type::BIND_JOINT,
        JointRole::Driver => feature_type::DRIVER_JOINT,
    };
    let mut predicate = AttrMap::new();
    predicate.insert(attr::JOINT_ID.to_string(), AttrValue::from(link.as_str()));
    predicate.insert(attr::FEATURE_TYPE.to_string(), AttrValue::from(tag));

    match scene.find_all(&predicate).as_slice() {
        [] => Err(RigError::MissingJoint {
            link: link.as_str().to_string(),
            role,
        }),
        [single] => Ok(*single),
        matches => Err(RigError::Scene(autorig_scene::SceneError::AmbiguousQuery {
            predicate: format!("{{joint_id={}, feature_type={}}}", link, tag),
            matches: matches.len(),
        })),
    }
}

/// Resolves a module container group by feature type, failing loudly when it
/// is missing (a construction-order defect upstream).
pub fn find_container(
    scene: &dyn SceneGraph,
    module: &ModuleName,
    group_tag: &str,
) -> Result<NodeId, RigError> {
    Ok(scene.find_single(&node_tags(module, group_tag))?)
}

/// Hides a node from the viewport and the channel box.
pub(crate) fn hide_node(scene: &mut dyn SceneGraph, node: NodeId) -> Result<(), RigError> {
    scene.set_attr(node, attr::VISIBILITY, AttrValue::from(false))?;
    scene.set_attr_flags(node, attr::VISIBILITY, false, false)?;
    Ok(())
}

/// Validates that a bind joint exists for every identifier. Read-only: on
/// failure nothing has been mutated.
pub fn validate_bind_joints(
    scene: &dyn SceneGraph,
    ids: &[LinkId],
) -> Result<(), RigError> {
    for link in ids {
        find_joint(scene, link, JointRole::Bind)?;
    }
    Ok(())
}

/// Creates the module root group and its guide/joint/control containers.
///
/// The root group carries the module's persisted state attributes, all
/// initially empty.
pub fn create_module_groups(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    type_name: &str,
) -> Result<NodeId, RigError> {
    let instance = module.instance();
    let mut root_attrs = AttrMap::new();
    root_attrs.insert(
        attr::MODULE_INSTANCE.to_string(),
        AttrValue::from(instance.clone()),
    );
    root_attrs.insert(attr::MODULE_TYPE.to_string(), AttrValue::from(type_name));
    root_attrs.insert(attr::MODULE_FEATURES.to_string(), AttrValue::from(""));
    root_attrs.insert(attr::INPUT_MODULE.to_string(), AttrValue::from(""));
    root_attrs.insert(attr::OUTPUT_MODULES.to_string(), AttrValue::from(""));
    let root = scene.create_node(kinds::TRANSFORM, &instance, root_attrs)?;

    for (suffix, tag) in [
        ("guide", feature_type::GUIDE_GROUP),
        ("joint", feature_type::JOINT_GROUP),
        ("control", feature_type::CONTROL_GROUP),
    ] {
        let group = scene.create_node(
            kinds::TRANSFORM,
            &format!("{}_{}", instance, suffix),
            node_tags(module, tag),
        )?;
        scene.reparent(&[group], root)?;
    }
    Ok(root)
}

/// Creates one driver joint per identifier, matched to its bind joint and
/// parented into the joint container.
pub fn create_driver_joints(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    ids: &[LinkId],
) -> Result<(), RigError> {
    let joint_group = find_container(scene, module, feature_type::JOINT_GROUP)?;
    for link in ids {
        let bind = find_joint(scene, link, JointRole::Bind)?;
        let mut tags = node_tags(module, feature_type::DRIVER_JOINT);
        tags.insert(attr::JOINT_ID.to_string(), AttrValue::from(link.as_str()));
        let driver = scene.create_node(kinds::JOINT, &format!("{}_driver", link), tags)?;
        scene.match_transform(driver, bind, MatchMode::Full)?;
        hide_node(scene, driver)?;
        scene.reparent(&[driver], joint_group)?;
    }
    Ok(())
}

/// Creates the module root guide locator at the first identifier's driver
/// joint, parented into the guide container.
pub fn create_module_root_guide(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    ids: &[LinkId],
) -> Result<(), RigError> {
    let guide_group = find_container(scene, module, feature_type::GUIDE_GROUP)?;
    let root_guide = scene.create_locator(
        &format!("{}_root", module.instance()),
        node_tags(module, feature_type::MODULE_ROOT),
    )?;
    if let Some(first) = ids.first() {
        let driver = find_joint(scene, first, JointRole::Driver)?;
        scene.match_transform(root_guide, driver, MatchMode::PositionOnly)?;
    }
    scene.reparent(&[root_guide], guide_group)?;
    Ok(())
}
