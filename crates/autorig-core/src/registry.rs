//! The module type registry.
//!
//! Registration is an explicit call made once during tool initialization and
//! yields an immutable lookup table; nothing registers itself as a side
//! effect of being declared. Declaration invariants are checked here, once
//! per type, never per instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RigError;
use crate::ids::ModuleName;
use crate::module::{Module, ModuleType};
use crate::modules::{HumanLeg, HumanSpine};

/// Immutable lookup table from module type name to declaration.
pub struct ModuleRegistry {
    types: BTreeMap<String, Arc<dyn ModuleType>>,
}

/// Builder collecting registrations before the table is frozen.
#[derive(Default, Debug)]
pub struct ModuleRegistryBuilder {
    types: BTreeMap<String, Arc<dyn ModuleType>>,
}

impl ModuleRegistryBuilder {
    /// Registers a module type declaration, validating it once.
    pub fn register(mut self, decl: Arc<dyn ModuleType>) -> Result<Self, RigError> {
        let type_name = decl.type_name();
        if type_name.is_empty() {
            return Err(RigError::Configuration(
                "module type declarations must carry a non-empty type name".to_string(),
            ));
        }
        // Probe the declaration with an unsided identity so malformed names
        // and duplicate feature names surface here rather than at first use.
        let probe = ModuleName::new(type_name, "")?;
        let mut seen = BTreeMap::new();
        for binding in decl.features(&probe) {
            if seen.insert(binding.feature.name(), ()).is_some() {
                return Err(RigError::Configuration(format!(
                    "module type '{}' declares feature '{}' more than once",
                    type_name,
                    binding.feature.name()
                )));
            }
        }
        for binding in decl.multi_features() {
            if seen.insert(binding.feature.name(), ()).is_some() {
                return Err(RigError::Configuration(format!(
                    "module type '{}' declares feature '{}' more than once",
                    type_name,
                    binding.feature.name()
                )));
            }
        }
        if self.types.contains_key(type_name) {
            return Err(RigError::Configuration(format!(
                "module type '{}' is already registered",
                type_name
            )));
        }
        self.types.insert(type_name.to_string(), decl);
        Ok(self)
    }

    /// Freezes the table.
    pub fn build(self) -> ModuleRegistry {
        ModuleRegistry { types: self.types }
    }
}

impl ModuleRegistry {
    /// Starts an empty registry builder.
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::default()
    }

    /// Builds a registry holding the shipped module types.
    pub fn with_builtin_modules() -> Self {
        let builtins: [Arc<dyn ModuleType>; 2] = [Arc::new(HumanLeg), Arc::new(HumanSpine)];
        let mut types: BTreeMap<String, Arc<dyn ModuleType>> = BTreeMap::new();
        for decl in builtins {
            types.insert(decl.type_name().to_string(), decl);
        }
        ModuleRegistry { types }
    }

    /// Resolves a declaration by type name. Failure is
    /// [`RigError::NotRegistered`], deliberately distinct from scene-level
    /// not-found conditions.
    pub fn resolve(&self, type_name: &str) -> Result<&Arc<dyn ModuleType>, RigError> {
        self.types
            .get(type_name)
            .ok_or_else(|| RigError::NotRegistered {
                type_name: type_name.to_string(),
            })
    }

    /// Instantiates a module from a type name and side tag.
    pub fn instantiate(&self, type_name: &str, side: &str) -> Result<Module, RigError> {
        Module::new(Arc::clone(self.resolve(type_name)?), side)
    }

    /// Reconstructs a module from a persisted instance name.
    ///
    /// An exact type-name match is tried first (unsided instance); otherwise
    /// the side is taken as the token after the last `_`. The split is a
    /// naming convention, not a structural guarantee: it only works because
    /// the remaining prefix must itself resolve as a registered type.
    pub fn create_from_name(&self, instance: &str) -> Result<Module, RigError> {
        if self.types.contains_key(instance) {
            return self.instantiate(instance, "");
        }
        if let Some((type_name, side)) = instance.rsplit_once('_') {
            if self.types.contains_key(type_name) {
                return self.instantiate(type_name, side);
            }
        }
        Err(RigError::NotRegistered {
            type_name: instance.to_string(),
        })
    }

    /// Registered type names, in order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureBinding;
    use crate::features::FkFeature;
    use crate::ids::LinkId;

    struct Nameless;

    impl ModuleType for Nameless {
        fn type_name(&self) -> &'static str {
            ""
        }
        fn id_list(&self, _name: &ModuleName) -> Vec<LinkId> {
            Vec::new()
        }
        fn features(&self, _name: &ModuleName) -> Vec<FeatureBinding> {
            Vec::new()
        }
    }

    struct DoubledFeature;

    impl ModuleType for DoubledFeature {
        fn type_name(&self) -> &'static str {
            "doubled"
        }
        fn id_list(&self, name: &ModuleName) -> Vec<LinkId> {
            vec![name.link("seg", 1)]
        }
        fn features(&self, name: &ModuleName) -> Vec<FeatureBinding> {
            vec![
                FeatureBinding {
                    feature: std::sync::Arc::new(FkFeature),
                    ids: self.id_list(name),
                },
                FeatureBinding {
                    feature: std::sync::Arc::new(FkFeature),
                    ids: self.id_list(name),
                },
            ]
        }
    }

    #[test]
    fn registration_rejects_empty_type_name() {
        let err = ModuleRegistry::builder()
            .register(Arc::new(Nameless))
            .unwrap_err();
        assert!(matches!(err, RigError::Configuration(_)));
    }

    #[test]
    fn registration_rejects_duplicate_feature_names() {
        let err = ModuleRegistry::builder()
            .register(Arc::new(DoubledFeature))
            .unwrap_err();
        assert!(matches!(err, RigError::Configuration(_)));
    }

    #[test]
    fn registration_rejects_double_registration() {
        let err = ModuleRegistry::builder()
            .register(Arc::new(HumanLeg))
            .unwrap()
            .register(Arc::new(HumanLeg))
            .unwrap_err();
        assert!(matches!(err, RigError::Configuration(_)));
    }

    #[test]
    fn lookup_of_unknown_type_is_not_registered() {
        let registry = ModuleRegistry::with_builtin_modules();
        let err = registry.resolve("robot_arm").unwrap_err();
        assert!(matches!(err, RigError::NotRegistered { .. }));
    }

    #[test]
    fn create_from_name_splits_side_when_needed() {
        let registry = ModuleRegistry::with_builtin_modules();

        let sided = registry.create_from_name("human_leg_L").unwrap();
        assert_eq!(sided.name().type_name(), "human_leg");
        assert_eq!(sided.name().side(), "L");

        // An exact type match wins before any splitting, so unsided types
        // containing underscores resolve correctly.
        let unsided = registry.create_from_name("human_spine").unwrap();
        assert_eq!(unsided.name().type_name(), "human_spine");
        assert_eq!(unsided.name().side(), "");

        assert!(matches!(
            registry.create_from_name("robot_arm_L"),
            Err(RigError::NotRegistered { .. })
        ));
    }
}
