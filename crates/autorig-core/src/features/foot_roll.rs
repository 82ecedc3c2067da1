//! The foot roll multi-feature.

use autorig_scene::{AttrValue, MatchMode, SceneGraph};

use crate::error::RigError;
use crate::feature::{MultiFeature, MultiFeatureConfig};
use crate::ids::ModuleName;
use crate::setup::find_container;
use crate::tags::{feature_type, node_tags};

/// Roll pivots for an IK foot plant.
///
/// A multi-module feature: it assumes the leg and foot modules it spans have
/// already been built, and is configured per module type with which pivots
/// to emit (`ball`, `toe`, `heel` booleans). Pivot locators are placed at
/// the module's terminal driver joint and parented under the guide
/// container; the switch wiring that consumes them lives outside this crate.
pub struct FootRollFeature;

const PIVOT_FLAGS: &[&str] = &["ball", "toe", "heel"];

impl MultiFeature for FootRollFeature {
    fn name(&self) -> &'static str {
        "foot_roll"
    }

    fn create(
        &self,
        module: &ModuleName,
        scene: &mut dyn SceneGraph,
        config: &MultiFeatureConfig,
    ) -> Result<(), RigError> {
        let drivers = scene.find_all(&node_tags(module, feature_type::DRIVER_JOINT));
        let terminal = *drivers.last().ok_or_else(|| {
            RigError::Configuration(format!(
                "foot_roll on '{}' requires driver joints; run create_module first",
                module
            ))
        })?;
        let guide_group = find_container(scene, module, feature_type::GUIDE_GROUP)?;

        for &flag in PIVOT_FLAGS {
            let enabled = config.get(flag).and_then(|v| v.as_bool()).unwrap_or(false);
            if !enabled {
                continue;
            }
            let pivot = scene.create_locator(
                &format!("{}_{}_roll_pivot", module.instance(), flag),
                node_tags(module, feature_type::FOOT_ROLL_PIVOT),
            )?;
            scene.set_attr(pivot, "pivot_role", AttrValue::from(flag))?;
            scene.match_transform(pivot, terminal, MatchMode::PositionOnly)?;
            scene.reparent(&[pivot], guide_group)?;
        }
        Ok(())
    }
}
