//! Procedural rig assembly from composable modules and features.
//!
//! A rig is assembled out of **modules** — named, side-tagged units owning an
//! ordered list of logical link identifiers — and **features**, pluggable
//! behaviors a module applies against those identifiers through a uniform
//! `create`/`attach`/`remove` contract. Module types are registered once
//! into an immutable [`ModuleRegistry`]; instances are reconstructible from
//! persisted names, so a rig's composition survives process restarts.
//!
//! The algorithmic core is the [FK chain builder](crate::fk): it emits a
//! constraint network of locators, aim-orientation solvers, and matrix
//! accumulators that gives every control a deterministic orientation
//! independent of scene hierarchy, accumulated link by link along the chain.
//!
//! All scene mutation goes through the [`autorig_scene::SceneGraph`]
//! contract; this crate never talks to a host directly.
//!
//! # Example
//!
//! ```
//! use autorig_core::ModuleRegistry;
//! use autorig_scene::{AttrMap, AttrValue, MemoryScene, SceneGraph};
//!
//! let mut scene = MemoryScene::new();
//! // Seed the bind skeleton the module expects.
//! for id in ["leg_L_1", "leg_L_2", "leg_L_3"] {
//!     let mut attrs = AttrMap::new();
//!     attrs.insert("joint_id".to_string(), AttrValue::from(id));
//!     attrs.insert("feature_type".to_string(), AttrValue::from("bind_joint"));
//!     scene.create_node("joint", &format!("{}_bind", id), attrs).unwrap();
//! }
//!
//! let registry = ModuleRegistry::with_builtin_modules();
//! let leg = registry.instantiate("human_leg", "L").unwrap();
//! leg.create_module(&mut scene).unwrap();
//! assert!(leg.add_feature(&mut scene, "fk").unwrap().is_none());
//! ```

pub mod error;
pub mod feature;
pub mod features;
pub mod fk;
pub mod ids;
pub mod module;
pub mod modules;
pub mod persist;
pub mod registry;
pub mod setup;
pub mod tags;
pub mod template;

pub use error::{JointRole, RigError, RigWarning};
pub use feature::{Feature, FeatureBinding, MultiFeature, MultiFeatureBinding, MultiFeatureConfig};
pub use fk::{
    build_fk_chain, discard_partial, parent_chain_nodes, AimDirection, ChainBuildError, FkChain,
    FkChainParams, FkLink,
};
pub use ids::{LinkId, ModuleName};
pub use module::{Module, ModuleType};
pub use registry::{ModuleRegistry, ModuleRegistryBuilder};
pub use template::{apply_template, save_template, validate_template, ModuleEntry, RigTemplate};
