//! Skeleton descriptions for headless builds.
//!
//! A skeleton file lists the bind joints a rig build expects: one entry per
//! logical link identifier with a world position. Seeding creates the
//! corresponding bind joints in the reference scene so module construction
//! can look them up.

use anyhow::Context;
use autorig_core::tags::{attr, feature_type};
use autorig_core::LinkId;
use autorig_scene::{kinds, AttrMap, AttrValue, MemoryScene, SceneGraph};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A skeleton description document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkeletonDoc {
    /// Bind joints in hierarchy order.
    #[serde(default)]
    pub joints: Vec<SkeletonJoint>,
}

/// One bind joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkeletonJoint {
    /// Logical link identifier (e.g. "leg_L_1").
    pub id: String,
    /// World position.
    pub position: [f64; 3],
}

/// Seeds the scene with the document's bind joints.
pub fn seed_bind_joints(scene: &mut MemoryScene, doc: &SkeletonDoc) -> anyhow::Result<()> {
    for joint in &doc.joints {
        let link = LinkId::new(joint.id.as_str())
            .with_context(|| format!("skeleton joint '{}'", joint.id))?;
        let mut attrs = AttrMap::new();
        attrs.insert(attr::JOINT_ID.to_string(), AttrValue::from(link.as_str()));
        attrs.insert(
            attr::FEATURE_TYPE.to_string(),
            AttrValue::from(feature_type::BIND_JOINT),
        );
        let node = scene
            .create_node(kinds::JOINT, &format!("{}_bind", link), attrs)
            .with_context(|| format!("creating bind joint for '{}'", link))?;
        scene
            .set_local_translation(node, DVec3::from(joint.position))
            .with_context(|| format!("positioning bind joint for '{}'", link))?;
    }
    Ok(())
}
