//! The human leg module type.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::feature::{FeatureBinding, MultiFeatureBinding, MultiFeatureConfig};
use crate::features::{FkFeature, FootRollFeature};
use crate::ids::{LinkId, ModuleName};
use crate::module::ModuleType;

/// Three-link human leg (hip, knee, ankle).
pub struct HumanLeg;

impl ModuleType for HumanLeg {
    fn type_name(&self) -> &'static str {
        "human_leg"
    }

    /// Identifier pattern the skeleton is expected to follow for driver
    /// joints, FK joints, and controls alike.
    fn id_list(&self, name: &ModuleName) -> Vec<LinkId> {
        (1..=3).map(|i| name.link("leg", i)).collect()
    }

    fn features(&self, name: &ModuleName) -> Vec<FeatureBinding> {
        vec![FeatureBinding {
            feature: Arc::new(FkFeature),
            ids: self.id_list(name),
        }]
    }

    /// Foot roll spans the leg and foot modules, so it ships as a
    /// multi-feature with a per-type pivot configuration.
    fn multi_features(&self) -> Vec<MultiFeatureBinding> {
        let mut config = MultiFeatureConfig::new();
        config.insert("ball".to_string(), json!(true));
        config.insert("toe".to_string(), json!(false));
        config.insert("heel".to_string(), json!(false));
        vec![MultiFeatureBinding {
            feature: Arc::new(FootRollFeature),
            config,
        }]
    }

    /// The leg attaches to the spine's pelvis link rather than its terminal
    /// joint.
    fn attach_key(&self) -> BTreeMap<String, LinkId> {
        let mut keys = BTreeMap::new();
        keys.insert(
            "human_spine".to_string(),
            LinkId::new_unchecked("spine_1".to_string()),
        );
        keys
    }
}
