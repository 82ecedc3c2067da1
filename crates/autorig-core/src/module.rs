//! Module type declarations and module instances.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use autorig_scene::{AttrValue, SceneGraph};

use crate::error::{RigError, RigWarning};
use crate::feature::{FeatureBinding, MultiFeatureBinding};
use crate::ids::{LinkId, ModuleName};
use crate::persist;
use crate::setup;
use crate::tags::attr;

/// A module type declaration: what a registered rig unit is made of.
///
/// Declarations are stateless descriptions; [`Module`] instances are built
/// from them through the registry. A declaration's invariants (non-empty
/// type name, unique feature names) are checked once at registration time,
/// not per instance.
pub trait ModuleType: Send + Sync {
    /// The registered type name (e.g. `human_leg`).
    fn type_name(&self) -> &'static str;

    /// The ordered logical link identifiers for an instance.
    fn id_list(&self, name: &ModuleName) -> Vec<LinkId>;

    /// Supported single features, each bound to the identifier sublist it
    /// operates on.
    fn features(&self, name: &ModuleName) -> Vec<FeatureBinding>;

    /// Supported multi-features, each bound to its configuration record.
    fn multi_features(&self) -> Vec<MultiFeatureBinding> {
        Vec::new()
    }

    /// Upstream instance name to the identifier on that module this module
    /// attaches to. Absent entries default to the upstream's terminal
    /// identifier.
    fn attach_key(&self) -> BTreeMap<String, LinkId> {
        BTreeMap::new()
    }

    /// Whether this module accepts an upstream connection.
    fn allow_input(&self) -> bool {
        true
    }

    /// Whether this module can feed downstream modules.
    fn allow_output(&self) -> bool {
        true
    }
}

impl fmt::Debug for dyn ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleType")
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// A live module instance: structured identity plus the feature dispatch
/// maps, built once at construction.
pub struct Module {
    name: ModuleName,
    decl: Arc<dyn ModuleType>,
    ids: Vec<LinkId>,
    features: BTreeMap<String, FeatureBinding>,
    multi_features: BTreeMap<String, MultiFeatureBinding>,
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("decl", &self.decl)
            .field("ids", &self.ids)
            .field("features", &self.features.keys().collect::<Vec<_>>())
            .field(
                "multi_features",
                &self.multi_features.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Module {
    /// Instantiates a module from its declaration and a side tag,
    /// initializing every supported feature and multi-feature.
    pub fn new(decl: Arc<dyn ModuleType>, side: &str) -> Result<Self, RigError> {
        let name = ModuleName::new(decl.type_name(), side)?;
        let ids = decl.id_list(&name);

        let mut features = BTreeMap::new();
        for binding in decl.features(&name) {
            features.insert(binding.feature.name().to_string(), binding);
        }
        let mut multi_features = BTreeMap::new();
        for binding in decl.multi_features() {
            multi_features.insert(binding.feature.name().to_string(), binding);
        }

        Ok(Module {
            name,
            decl,
            ids,
            features,
            multi_features,
        })
    }

    /// The module's structured identity.
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// The ordered link identifiers.
    pub fn id_list(&self) -> &[LinkId] {
        &self.ids
    }

    /// Names of supported single features, in dispatch order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Names of supported multi-features, in dispatch order.
    pub fn multi_feature_names(&self) -> impl Iterator<Item = &str> {
        self.multi_features.keys().map(String::as_str)
    }

    /// Whether a feature name resolves against this module (single or
    /// multi).
    pub fn supports_feature(&self, feature: &str) -> bool {
        self.features.contains_key(feature) || self.multi_features.contains_key(feature)
    }

    /// Builds the module's scene scaffolding.
    ///
    /// Validates that bind joints exist for the whole identifier list first
    /// (aborting with no mutation otherwise), then creates container groups,
    /// driver joints, and the module root guide — in that order; later steps
    /// parent into and query what earlier steps created.
    pub fn create_module(&self, scene: &mut dyn SceneGraph) -> Result<(), RigError> {
        setup::validate_bind_joints(scene, &self.ids)?;
        setup::create_module_groups(scene, &self.name, self.decl.type_name())?;
        setup::create_driver_joints(scene, &self.name, &self.ids)?;
        setup::create_module_root_guide(scene, &self.name, &self.ids)?;
        Ok(())
    }

    /// Applies a feature by name.
    ///
    /// Single features resolve first: `create` against the bound identifier
    /// sublist, record the name in the persisted feature list, then
    /// `attach`. Multi-features: `create` from the stored configuration
    /// record, then record the name. An unsupported name performs no scene
    /// writes and returns a warning.
    pub fn add_feature(
        &self,
        scene: &mut dyn SceneGraph,
        feature: &str,
    ) -> Result<Option<RigWarning>, RigError> {
        if let Some(binding) = self.features.get(feature) {
            binding.feature.create(&self.name, scene, &binding.ids)?;
            persist::append_feature(scene, &self.name, feature)?;
            binding.feature.attach(&self.name, scene)?;
            return Ok(None);
        }
        if let Some(binding) = self.multi_features.get(feature) {
            binding.feature.create(&self.name, scene, &binding.config)?;
            persist::append_feature(scene, &self.name, feature)?;
            return Ok(None);
        }
        let warning = RigWarning::UnsupportedFeature {
            module_type: self.decl.type_name().to_string(),
            feature: feature.to_string(),
        };
        log::warn!("{}", warning);
        Ok(Some(warning))
    }

    /// Removes a feature by name, undoing what addition recorded: the
    /// feature's scene network is torn down and its entry is deleted from
    /// the persisted list. Only single features are removable; anything
    /// else warns.
    pub fn remove_feature(
        &self,
        scene: &mut dyn SceneGraph,
        feature: &str,
    ) -> Result<Option<RigWarning>, RigError> {
        if let Some(binding) = self.features.get(feature) {
            binding.feature.remove(&self.name, scene)?;
            persist::remove_feature_entry(scene, &self.name, feature)?;
            return Ok(None);
        }
        let warning = RigWarning::UnsupportedFeature {
            module_type: self.decl.type_name().to_string(),
            feature: feature.to_string(),
        };
        log::warn!("{}", warning);
        Ok(Some(warning))
    }

    /// Records a module connection: `upstream` feeds `downstream`.
    ///
    /// Writes the upstream reference and attach-point identifier on the
    /// downstream root, and appends the downstream instance to the
    /// upstream's output list. Refused (with a warning, no writes) when
    /// either side's allow flag forbids it.
    pub fn connect_modules(
        scene: &mut dyn SceneGraph,
        upstream: &Module,
        downstream: &Module,
    ) -> Result<Option<RigWarning>, RigError> {
        if !upstream.decl.allow_output() {
            let warning = RigWarning::ConnectionNotAllowed {
                module: upstream.name.instance(),
                reason: "module does not allow outputs".to_string(),
            };
            log::warn!("{}", warning);
            return Ok(Some(warning));
        }
        if !downstream.decl.allow_input() {
            let warning = RigWarning::ConnectionNotAllowed {
                module: downstream.name.instance(),
                reason: "module does not allow inputs".to_string(),
            };
            log::warn!("{}", warning);
            return Ok(Some(warning));
        }

        let upstream_instance = upstream.name.instance();
        let attach_point = downstream
            .decl
            .attach_key()
            .get(&upstream_instance)
            .cloned()
            .or_else(|| upstream.ids.last().cloned());

        persist::append_input(scene, &downstream.name, &upstream_instance)?;
        persist::append_output(scene, &upstream.name, &downstream.name.instance())?;
        if let Some(attach_point) = attach_point {
            let root = persist::module_root(scene, &downstream.name)?;
            scene.set_attr(
                root,
                attr::ATTACH_POINT,
                AttrValue::from(attach_point.as_str()),
            )?;
        }
        Ok(None)
    }
}
