//! Scene graph contract for the autorig toolset.
//!
//! Rig construction code never talks to a DCC host directly; it talks to the
//! [`SceneGraph`] trait. The trait covers the handful of primitives rig
//! assembly needs: typed node creation with an attribute bag, attribute
//! connections with force-override semantics, attribute I/O, transform
//! matching, attribute-predicate queries, deletion, and organizational
//! reparenting.
//!
//! The crate also ships [`MemoryScene`], a reference implementation backed by
//! an in-memory node table with a small pull-based matrix evaluator. It is
//! what the test suite and the headless CLI run against; a host integration
//! implements the same trait against a real scene.
//!
//! # Example
//!
//! ```
//! use autorig_scene::{AttrMap, AttrValue, MemoryScene, SceneGraph};
//!
//! let mut scene = MemoryScene::new();
//! let mut attrs = AttrMap::new();
//! attrs.insert("feature_type".to_string(), AttrValue::from("bind_joint"));
//! let joint = scene.create_node("joint", "leg_L_1_bind", attrs).unwrap();
//! assert_eq!(scene.node_name(joint).unwrap(), "leg_L_1_bind");
//! ```

pub mod attr;
pub mod error;
pub mod graph;
pub mod memory;

pub use attr::{AttrMap, AttrValue};
pub use error::SceneError;
pub use graph::{kinds, plugs, MatchMode, NodeId, SceneGraph};
pub use memory::{MemoryScene, SceneDump};
