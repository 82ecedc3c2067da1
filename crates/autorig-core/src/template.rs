//! Rig templates: snapshot and replay of module composition.
//!
//! A template records which modules a rig is made of and what was applied to
//! each — the persisted feature list plus module connections — so the same
//! composition can be rebuilt later against a skeleton with the same
//! identifier layout. Templates only ever go through the public module
//! contract; they never touch feature internals. File I/O stays with the
//! caller.

use autorig_scene::{AttrValue, SceneGraph};
use serde::{Deserialize, Serialize};

use crate::error::{RigError, RigWarning};
use crate::module::Module;
use crate::persist::PersistedList;
use crate::registry::ModuleRegistry;
use crate::tags::attr;

/// A saved rig composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigTemplate {
    /// Template name (e.g. "human").
    pub name: String,
    /// Module entries in creation order.
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// One module's snapshot within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
    /// Instance name (e.g. "human_leg_L").
    pub module: String,
    /// Registered type name (e.g. "human_leg").
    pub module_type: String,
    /// Applied feature names, in application order.
    #[serde(default)]
    pub features: Vec<String>,
    /// Upstream module instance names.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Downstream module instance names.
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Snapshots every module in the scene into a template.
pub fn save_template(scene: &dyn SceneGraph, name: &str) -> Result<RigTemplate, RigError> {
    let mut modules = Vec::new();
    for root in scene.find_all_with_attr(attr::MODULE_INSTANCE) {
        let instance = read_string(scene, root, attr::MODULE_INSTANCE)?;
        let module_type = read_string(scene, root, attr::MODULE_TYPE)?;
        let features = read_persisted(scene, root, attr::MODULE_FEATURES, "feature name")?;
        let inputs = read_persisted(scene, root, attr::INPUT_MODULE, "module reference")?;
        let outputs = read_persisted(scene, root, attr::OUTPUT_MODULES, "module reference")?;
        modules.push(ModuleEntry {
            module: instance,
            module_type,
            features: features.iter().map(str::to_string).collect(),
            inputs: inputs.iter().map(str::to_string).collect(),
            outputs: outputs.iter().map(str::to_string).collect(),
        });
    }
    Ok(RigTemplate {
        name: name.to_string(),
        modules,
    })
}

/// Validates a template against a registry without touching any scene.
///
/// Unknown module types are hard errors; unsupported feature names are
/// warnings (replay would skip them the same way `add_feature` does).
pub fn validate_template(
    registry: &ModuleRegistry,
    template: &RigTemplate,
) -> Result<Vec<RigWarning>, RigError> {
    let mut warnings = Vec::new();
    for entry in &template.modules {
        registry.resolve(&entry.module_type)?;
        let module = registry.create_from_name(&entry.module)?;
        if module.name().type_name() != entry.module_type {
            return Err(RigError::Configuration(format!(
                "template entry '{}' resolves to type '{}', expected '{}'",
                entry.module,
                module.name().type_name(),
                entry.module_type
            )));
        }
        for feature in &entry.features {
            if !module.supports_feature(feature) {
                warnings.push(RigWarning::UnsupportedFeature {
                    module_type: entry.module_type.clone(),
                    feature: feature.clone(),
                });
            }
        }
    }
    Ok(warnings)
}

/// Replays a template into a scene.
///
/// Two passes, like interactive construction: every module is created
/// first, then features are re-applied and connections restored. Warnings
/// (unsupported features, refused connections) are collected and returned;
/// missing bind joints and unknown module types abort.
pub fn apply_template(
    registry: &ModuleRegistry,
    scene: &mut dyn SceneGraph,
    template: &RigTemplate,
) -> Result<Vec<RigWarning>, RigError> {
    let mut warnings = Vec::new();

    let mut modules = Vec::with_capacity(template.modules.len());
    for entry in &template.modules {
        let module = registry.create_from_name(&entry.module)?;
        module.create_module(scene)?;
        modules.push(module);
    }

    for (entry, module) in template.modules.iter().zip(&modules) {
        for feature in &entry.features {
            if let Some(warning) = module.add_feature(scene, feature)? {
                warnings.push(warning);
            }
        }
        for input in &entry.inputs {
            let upstream = registry.create_from_name(input)?;
            if let Some(warning) = Module::connect_modules(scene, &upstream, module)? {
                warnings.push(warning);
            }
        }
    }
    Ok(warnings)
}

fn read_string(
    scene: &dyn SceneGraph,
    node: autorig_scene::NodeId,
    attr_name: &str,
) -> Result<String, RigError> {
    Ok(scene
        .get_attr(node, attr_name)?
        .and_then(AttrValue::as_str)
        .unwrap_or("")
        .to_string())
}

fn read_persisted(
    scene: &dyn SceneGraph,
    node: autorig_scene::NodeId,
    attr_name: &str,
    what: &'static str,
) -> Result<PersistedList, RigError> {
    let raw = read_string(scene, node, attr_name)?;
    PersistedList::parse(&raw, what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn template_json_round_trip() {
        let template = RigTemplate {
            name: "human".to_string(),
            modules: vec![ModuleEntry {
                module: "human_leg_L".to_string(),
                module_type: "human_leg".to_string(),
                features: vec!["fk".to_string()],
                inputs: vec!["human_spine".to_string()],
                outputs: Vec::new(),
            }],
        };
        let json = serde_json::to_string_pretty(&template).unwrap();
        let back: RigTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn template_rejects_unknown_fields() {
        let json = r#"{"name": "human", "modules": [], "extra": 1}"#;
        assert!(serde_json::from_str::<RigTemplate>(json).is_err());
    }

    #[test]
    fn validate_flags_unknown_types_and_features() {
        let registry = ModuleRegistry::with_builtin_modules();

        let unknown_type = RigTemplate {
            name: "t".to_string(),
            modules: vec![ModuleEntry {
                module: "robot_arm_L".to_string(),
                module_type: "robot_arm".to_string(),
                features: Vec::new(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            }],
        };
        assert!(matches!(
            validate_template(&registry, &unknown_type),
            Err(RigError::NotRegistered { .. })
        ));

        let unknown_feature = RigTemplate {
            name: "t".to_string(),
            modules: vec![ModuleEntry {
                module: "human_leg_L".to_string(),
                module_type: "human_leg".to_string(),
                features: vec!["stretchy".to_string()],
                inputs: Vec::new(),
                outputs: Vec::new(),
            }],
        };
        let warnings = validate_template(&registry, &unknown_feature).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), "W001");
    }
}
