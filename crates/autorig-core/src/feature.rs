//! The feature capability contract.
//!
//! A feature is a pluggable behavior a module can apply against its link
//! identifiers. Modules invoke features uniformly through this contract
//! regardless of the concrete behavior; dispatch goes through a closed,
//! per-module map of named feature instances built once at module
//! construction.

use std::sync::Arc;

use autorig_scene::SceneGraph;

use crate::error::RigError;
use crate::ids::{LinkId, ModuleName};

/// Configuration record for a multi-module feature, stored on the module
/// type declaration.
pub type MultiFeatureConfig = serde_json::Map<String, serde_json::Value>;

/// A single-module feature: operates on a sublist of the owning module's
/// link identifiers.
pub trait Feature: Send + Sync {
    /// The feature's name, used for dispatch and persisted bookkeeping.
    fn name(&self) -> &'static str;

    /// Builds the feature's scene network for the given identifiers.
    fn create(
        &self,
        module: &ModuleName,
        scene: &mut dyn SceneGraph,
        ids: &[LinkId],
    ) -> Result<(), RigError>;

    /// Hooks the created network up to the module's driver layer. Invoked
    /// after the feature name has been persisted.
    fn attach(&self, module: &ModuleName, scene: &mut dyn SceneGraph) -> Result<(), RigError>;

    /// Tears the feature's scene network down.
    fn remove(&self, module: &ModuleName, scene: &mut dyn SceneGraph) -> Result<(), RigError>;
}

/// A feature spanning multiple modules; created from a stored configuration
/// record rather than an identifier sublist. Multi-features have no removal
/// contract.
pub trait MultiFeature: Send + Sync {
    /// The feature's name, used for dispatch and persisted bookkeeping.
    fn name(&self) -> &'static str;

    /// Builds the feature's scene network from its configuration record.
    fn create(
        &self,
        module: &ModuleName,
        scene: &mut dyn SceneGraph,
        config: &MultiFeatureConfig,
    ) -> Result<(), RigError>;
}

/// A supported single feature paired with the identifier sublist it operates
/// on.
#[derive(Clone)]
pub struct FeatureBinding {
    pub feature: Arc<dyn Feature>,
    pub ids: Vec<LinkId>,
}

/// A supported multi-feature paired with its configuration record.
#[derive(Clone)]
pub struct MultiFeatureBinding {
    pub feature: Arc<dyn MultiFeature>,
    pub config: MultiFeatureConfig,
}
