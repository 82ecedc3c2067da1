//! The human spine module type.

use std::sync::Arc;

use crate::feature::FeatureBinding;
use crate::features::FkFeature;
use crate::ids::{LinkId, ModuleName};
use crate::module::ModuleType;

/// Three-link spine column, usually built unsided.
pub struct HumanSpine;

impl ModuleType for HumanSpine {
    fn type_name(&self) -> &'static str {
        "human_spine"
    }

    fn id_list(&self, name: &ModuleName) -> Vec<LinkId> {
        (1..=3).map(|i| name.link("spine", i)).collect()
    }

    fn features(&self, name: &ModuleName) -> Vec<FeatureBinding> {
        vec![FeatureBinding {
            feature: Arc::new(FkFeature),
            ids: self.id_list(name),
        }]
    }
}
