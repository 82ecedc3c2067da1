//! In-memory reference implementation of the scene graph contract.

use std::collections::HashMap;

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::attr::{AttrMap, AttrValue};
use crate::error::SceneError;
use crate::graph::{kinds, plugs, MatchMode, NodeId, SceneGraph};

/// Maximum plug-evaluation depth before a dependency cycle is assumed.
const MAX_EVAL_DEPTH: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct AttrFlags {
    keyable: bool,
    channel_box: bool,
}

#[derive(Debug, Clone)]
struct NodeRecord {
    name: String,
    kind: String,
    attrs: AttrMap,
    flags: HashMap<String, AttrFlags>,
    translation: DVec3,
    rotation: DQuat,
    parent: Option<NodeId>,
    alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Connection {
    src: NodeId,
    src_attr: String,
    dst: NodeId,
    dst_attr: String,
}

/// In-memory scene graph with a pull-based matrix evaluator.
///
/// Transform semantics are deliberately simple and match what the rig
/// builders rely on: a node's world transform is the matrix driving its
/// `offset_parent_matrix` plug (identity when unconnected) composed with its
/// local TRS. Scene-hierarchy parenting is organizational only and never
/// affects transforms.
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: Vec<NodeRecord>,
    by_name: HashMap<String, NodeId>,
    connections: Vec<Connection>,
}

impl MemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes in the scene.
    pub fn live_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    /// Sets a node's local translation outright (scene-seeding helper).
    pub fn set_local_translation(&mut self, node: NodeId, t: DVec3) -> Result<(), SceneError> {
        self.record_mut(node)?.translation = t;
        Ok(())
    }

    /// Sets a node's local rotation outright (scene-seeding helper).
    pub fn set_local_rotation(&mut self, node: NodeId, r: DQuat) -> Result<(), SceneError> {
        self.record_mut(node)?.rotation = r;
        Ok(())
    }

    /// Evaluates a node's world transform.
    pub fn world_matrix(&self, node: NodeId) -> Result<DMat4, SceneError> {
        self.record(node)?;
        self.eval_world(node, 0)
    }

    /// Evaluates a node's world translation.
    pub fn world_translation(&self, node: NodeId) -> Result<DVec3, SceneError> {
        Ok(mat_translation(self.world_matrix(node)?))
    }

    /// Evaluates the primary output of a matrix-operator node
    /// (`output_matrix` for aim/inverse nodes, `matrix_sum` for mult nodes).
    pub fn output_matrix(&self, node: NodeId) -> Result<DMat4, SceneError> {
        let kind = self.record(node)?.kind.clone();
        let attr = match kind.as_str() {
            kinds::MULT_MATRIX => plugs::MATRIX_SUM,
            _ => plugs::OUTPUT_MATRIX,
        };
        self.eval_plug(node, attr, 0)
    }

    /// Serializable snapshot of the live scene.
    pub fn dump(&self) -> SceneDump {
        let mut nodes: Vec<NodeDump> = self
            .nodes
            .iter()
            .filter(|n| n.alive)
            .map(|n| NodeDump {
                name: n.name.clone(),
                kind: n.kind.clone(),
                parent: n
                    .parent
                    .and_then(|p| self.nodes.get(p.0 as usize))
                    .filter(|p| p.alive)
                    .map(|p| p.name.clone()),
                attrs: n.attrs.clone(),
                translation: n.translation.to_array(),
                rotation: n.rotation.to_array(),
            })
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut connections: Vec<ConnectionDump> = self
            .connections
            .iter()
            .map(|c| ConnectionDump {
                src: self.nodes[c.src.0 as usize].name.clone(),
                src_attr: c.src_attr.clone(),
                dst: self.nodes[c.dst.0 as usize].name.clone(),
                dst_attr: c.dst_attr.clone(),
            })
            .collect();
        connections.sort();

        SceneDump { nodes, connections }
    }

    fn record(&self, node: NodeId) -> Result<&NodeRecord, SceneError> {
        match self.nodes.get(node.0 as usize) {
            Some(record) if record.alive => Ok(record),
            Some(record) => Err(SceneError::NodeNotFound {
                node: record.name.clone(),
            }),
            None => Err(SceneError::NodeNotFound {
                node: format!("#{}", node.0),
            }),
        }
    }

    fn record_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, SceneError> {
        match self.nodes.get_mut(node.0 as usize) {
            Some(record) if record.alive => Ok(record),
            Some(record) => Err(SceneError::NodeNotFound {
                node: record.name.clone(),
            }),
            None => Err(SceneError::NodeNotFound {
                node: format!("#{}", node.0),
            }),
        }
    }

    fn local_matrix(record: &NodeRecord) -> DMat4 {
        DMat4::from_rotation_translation(record.rotation, record.translation)
    }

    fn incoming(&self, dst: NodeId, dst_attr: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.dst == dst && c.dst_attr == dst_attr)
    }

    fn eval_input(
        &self,
        dst: NodeId,
        dst_attr: &str,
        depth: u32,
    ) -> Result<Option<DMat4>, SceneError> {
        match self.incoming(dst, dst_attr) {
            Some(c) => Ok(Some(self.eval_plug(c.src, &c.src_attr, depth + 1)?)),
            None => Ok(None),
        }
    }

    fn eval_world(&self, node: NodeId, depth: u32) -> Result<DMat4, SceneError> {
        let record = self.record(node)?;
        if depth > MAX_EVAL_DEPTH {
            return Err(SceneError::EvaluationCycle {
                node: record.name.clone(),
            });
        }
        let offset = self
            .eval_input(node, plugs::OFFSET_PARENT_MATRIX, depth)?
            .unwrap_or(DMat4::IDENTITY);
        Ok(offset * Self::local_matrix(record))
    }

    fn eval_plug(&self, node: NodeId, attr: &str, depth: u32) -> Result<DMat4, SceneError> {
        let record = self.record(node)?;
        if depth > MAX_EVAL_DEPTH {
            return Err(SceneError::EvaluationCycle {
                node: record.name.clone(),
            });
        }
        match (record.kind.as_str(), attr) {
            (kinds::AIM_MATRIX, plugs::OUTPUT_MATRIX) => self.eval_aim(node, depth),
            (kinds::INVERSE_MATRIX, plugs::OUTPUT_MATRIX) => {
                let input = self
                    .eval_input(node, plugs::INPUT_MATRIX, depth)?
                    .unwrap_or(DMat4::IDENTITY);
                Ok(input.inverse())
            }
            (kinds::MULT_MATRIX, plugs::MATRIX_SUM) => self.eval_product(node, depth),
            (kinds::AIM_MATRIX | kinds::INVERSE_MATRIX | kinds::MULT_MATRIX, _) => {
                Err(SceneError::UnsupportedPlug {
                    node: record.name.clone(),
                    attr: attr.to_string(),
                })
            }
            (_, plugs::WORLD_MATRIX) => self.eval_world(node, depth),
            _ => Err(SceneError::UnsupportedPlug {
                node: record.name.clone(),
                attr: attr.to_string(),
            }),
        }
    }

    /// Aim solver: positions the output at the input transform and orients
    /// the local X axis (sign-selected) toward the primary target, with Y
    /// resolved toward the secondary target. The two targets disambiguate
    /// aim and roll without reading any parent rotation.
    fn eval_aim(&self, node: NodeId, depth: u32) -> Result<DMat4, SceneError> {
        let origin = mat_translation(
            self.eval_input(node, plugs::INPUT_MATRIX, depth)?
                .unwrap_or(DMat4::IDENTITY),
        );
        let primary = mat_translation(
            self.eval_input(node, plugs::PRIMARY_TARGET_MATRIX, depth)?
                .unwrap_or(DMat4::IDENTITY),
        );
        let secondary = mat_translation(
            self.eval_input(node, plugs::SECONDARY_TARGET_MATRIX, depth)?
                .unwrap_or(DMat4::IDENTITY),
        );
        let sign = self
            .record(node)?
            .attrs
            .get("primary_axis_x")
            .and_then(AttrValue::as_f64)
            .unwrap_or(1.0)
            .signum();

        let aim = (primary - origin).try_normalize().unwrap_or(DVec3::X);
        let up_hint = (secondary - origin).try_normalize().unwrap_or(DVec3::Y);
        let x = aim * sign;
        let z = x
            .cross(up_hint)
            .try_normalize()
            .unwrap_or_else(|| x.cross(DVec3::Z).try_normalize().unwrap_or(DVec3::Z));
        let y = z.cross(x);

        Ok(DMat4::from_cols(
            x.extend(0.0),
            y.extend(0.0),
            z.extend(0.0),
            origin.extend(1.0),
        ))
    }

    /// Ordered product over `matrix_in[i]` slots; slot 0 is applied first.
    fn eval_product(&self, node: NodeId, depth: u32) -> Result<DMat4, SceneError> {
        let mut slots: Vec<(usize, &Connection)> = self
            .connections
            .iter()
            .filter(|c| c.dst == node)
            .filter_map(|c| parse_matrix_slot(&c.dst_attr).map(|slot| (slot, c)))
            .collect();
        slots.sort_by_key(|(slot, _)| *slot);

        let mut acc = DMat4::IDENTITY;
        for (_, c) in slots {
            acc = self.eval_plug(c.src, &c.src_attr, depth + 1)? * acc;
        }
        Ok(acc)
    }
}

fn mat_translation(m: DMat4) -> DVec3 {
    m.w_axis.truncate()
}

fn parse_matrix_slot(attr: &str) -> Option<usize> {
    attr.strip_prefix("matrix_in[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

fn format_predicate(predicate: &AttrMap) -> String {
    let pairs: Vec<String> = predicate
        .iter()
        .map(|(k, v)| match v {
            AttrValue::String(s) => format!("{}={}", k, s),
            AttrValue::Float(f) => format!("{}={}", k, f),
            AttrValue::Int(i) => format!("{}={}", k, i),
            AttrValue::Bool(b) => format!("{}={}", k, b),
        })
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

impl SceneGraph for MemoryScene {
    fn create_node(
        &mut self,
        kind: &str,
        name: &str,
        attrs: AttrMap,
    ) -> Result<NodeId, SceneError> {
        if self.by_name.contains_key(name) {
            return Err(SceneError::NameCollision {
                name: name.to_string(),
            });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            name: name.to_string(),
            kind: kind.to_string(),
            attrs,
            flags: HashMap::new(),
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            parent: None,
            alive: true,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    fn node_name(&self, node: NodeId) -> Result<&str, SceneError> {
        Ok(&self.record(node)?.name)
    }

    fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    fn exists(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.alive)
            .unwrap_or(false)
    }

    fn connect(
        &mut self,
        src: NodeId,
        src_attr: &str,
        dst: NodeId,
        dst_attr: &str,
        force: bool,
    ) -> Result<(), SceneError> {
        self.record(src)?;
        self.record(dst)?;
        if let Some(existing) = self.incoming(dst, dst_attr) {
            if !force {
                return Err(SceneError::SlotAlreadyDriven {
                    node: self.nodes[dst.0 as usize].name.clone(),
                    attr: dst_attr.to_string(),
                    existing: format!(
                        "{}.{}",
                        self.nodes[existing.src.0 as usize].name, existing.src_attr
                    ),
                });
            }
            self.connections
                .retain(|c| !(c.dst == dst && c.dst_attr == dst_attr));
        }
        self.connections.push(Connection {
            src,
            src_attr: src_attr.to_string(),
            dst,
            dst_attr: dst_attr.to_string(),
        });
        Ok(())
    }

    fn connection_source(&self, dst: NodeId, dst_attr: &str) -> Option<(NodeId, String)> {
        self.incoming(dst, dst_attr)
            .map(|c| (c.src, c.src_attr.clone()))
    }

    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<(), SceneError> {
        self.record_mut(node)?.attrs.insert(attr.to_string(), value);
        Ok(())
    }

    fn get_attr(&self, node: NodeId, attr: &str) -> Result<Option<&AttrValue>, SceneError> {
        Ok(self.record(node)?.attrs.get(attr))
    }

    fn set_attr_flags(
        &mut self,
        node: NodeId,
        attr: &str,
        keyable: bool,
        channel_box: bool,
    ) -> Result<(), SceneError> {
        self.record_mut(node)?.flags.insert(
            attr.to_string(),
            AttrFlags {
                keyable,
                channel_box,
            },
        );
        Ok(())
    }

    fn match_transform(
        &mut self,
        node: NodeId,
        target: NodeId,
        mode: MatchMode,
    ) -> Result<(), SceneError> {
        let target_world = self.world_matrix(target)?;
        let offset = self
            .eval_input(node, plugs::OFFSET_PARENT_MATRIX, 0)?
            .unwrap_or(DMat4::IDENTITY);
        let offset_inv = offset.inverse();
        let record = self.record_mut(node)?;
        match mode {
            MatchMode::Full => {
                let local = offset_inv * target_world;
                let (_, rotation, translation) = local.to_scale_rotation_translation();
                record.rotation = rotation;
                record.translation = translation;
            }
            MatchMode::PositionOnly => {
                record.translation = offset_inv.transform_point3(mat_translation(target_world));
            }
        }
        Ok(())
    }

    fn offset_local_translation(&mut self, node: NodeId, delta: DVec3) -> Result<(), SceneError> {
        let record = self.record_mut(node)?;
        record.translation += record.rotation * delta;
        Ok(())
    }

    fn find_single(&self, predicate: &AttrMap) -> Result<NodeId, SceneError> {
        let matches = self.find_all(predicate);
        match matches.as_slice() {
            [single] => Ok(*single),
            _ => Err(SceneError::AmbiguousQuery {
                predicate: format_predicate(predicate),
                matches: matches.len(),
            }),
        }
    }

    fn find_all(&self, predicate: &AttrMap) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.alive)
            .filter(|(_, n)| {
                predicate
                    .iter()
                    .all(|(k, v)| n.attrs.get(k).map(|actual| actual == v).unwrap_or(false))
            })
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn find_all_with_attr(&self, attr: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.alive && n.attrs.contains_key(attr))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn delete(&mut self, nodes: &[NodeId]) -> Result<(), SceneError> {
        for &node in nodes {
            self.record(node)?;
        }
        for &node in nodes {
            let record = &mut self.nodes[node.0 as usize];
            record.alive = false;
            self.by_name.remove(&record.name);
            self.connections
                .retain(|c| c.src != node && c.dst != node);
        }
        Ok(())
    }

    fn reparent(&mut self, nodes: &[NodeId], parent: NodeId) -> Result<(), SceneError> {
        self.record(parent)?;
        for &node in nodes {
            self.record(node)?;
        }
        for &node in nodes {
            self.nodes[node.0 as usize].parent = Some(parent);
        }
        Ok(())
    }
}

/// Serializable snapshot of a [`MemoryScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDump {
    /// Live nodes, ordered by name.
    pub nodes: Vec<NodeDump>,
    /// Connections, ordered.
    pub connections: Vec<ConnectionDump>,
}

/// One node in a [`SceneDump`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDump {
    pub name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub attrs: AttrMap,
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
}

/// One connection in a [`SceneDump`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionDump {
    pub src: String,
    pub src_attr: String,
    pub dst: String,
    pub dst_attr: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::attr_map;
    use pretty_assertions::assert_eq;

    fn locator(scene: &mut MemoryScene, name: &str) -> NodeId {
        scene.create_locator(name, AttrMap::new()).unwrap()
    }

    #[test]
    fn node_names_are_unique() {
        let mut scene = MemoryScene::new();
        locator(&mut scene, "a");
        let err = scene.create_locator("a", AttrMap::new()).unwrap_err();
        assert_eq!(
            err,
            SceneError::NameCollision {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn connect_respects_force_override() {
        let mut scene = MemoryScene::new();
        let a = locator(&mut scene, "a");
        let b = locator(&mut scene, "b");
        let c = locator(&mut scene, "c");

        scene
            .connect(a, plugs::WORLD_MATRIX, c, plugs::OFFSET_PARENT_MATRIX, false)
            .unwrap();
        let err = scene
            .connect(b, plugs::WORLD_MATRIX, c, plugs::OFFSET_PARENT_MATRIX, false)
            .unwrap_err();
        assert!(matches!(err, SceneError::SlotAlreadyDriven { .. }));

        scene
            .connect(b, plugs::WORLD_MATRIX, c, plugs::OFFSET_PARENT_MATRIX, true)
            .unwrap();
        assert_eq!(
            scene.connection_source(c, plugs::OFFSET_PARENT_MATRIX),
            Some((b, plugs::WORLD_MATRIX.to_string()))
        );
    }

    #[test]
    fn find_single_requires_exactly_one_match() {
        let mut scene = MemoryScene::new();
        scene
            .create_locator("a", attr_map([("feature_type", "guide_group")]))
            .unwrap();
        assert!(scene
            .find_single(&attr_map([("feature_type", "guide_group")]))
            .is_ok());

        assert!(matches!(
            scene.find_single(&attr_map([("feature_type", "joint_group")])),
            Err(SceneError::AmbiguousQuery { matches: 0, .. })
        ));

        scene
            .create_locator("b", attr_map([("feature_type", "guide_group")]))
            .unwrap();
        assert!(matches!(
            scene.find_single(&attr_map([("feature_type", "guide_group")])),
            Err(SceneError::AmbiguousQuery { matches: 2, .. })
        ));
    }

    #[test]
    fn match_transform_position_only_ignores_rotation() {
        let mut scene = MemoryScene::new();
        let target = locator(&mut scene, "target");
        scene
            .set_local_translation(target, DVec3::new(1.0, 2.0, 3.0))
            .unwrap();
        scene
            .set_local_rotation(target, DQuat::from_rotation_z(1.0))
            .unwrap();

        let node = locator(&mut scene, "node");
        scene
            .match_transform(node, target, MatchMode::PositionOnly)
            .unwrap();

        let world = scene.world_matrix(node).unwrap();
        let (_, rotation, translation) = world.to_scale_rotation_translation();
        assert!((translation - DVec3::new(1.0, 2.0, 3.0)).length() < 1e-9);
        assert!(rotation.angle_between(DQuat::IDENTITY) < 1e-9);
    }

    #[test]
    fn offset_parent_connection_drives_world_transform() {
        let mut scene = MemoryScene::new();
        let parent = locator(&mut scene, "parent");
        scene
            .set_local_translation(parent, DVec3::new(5.0, 0.0, 0.0))
            .unwrap();
        let child = locator(&mut scene, "child");
        scene
            .set_local_translation(child, DVec3::new(0.0, 1.0, 0.0))
            .unwrap();
        scene
            .connect(
                parent,
                plugs::WORLD_MATRIX,
                child,
                plugs::OFFSET_PARENT_MATRIX,
                false,
            )
            .unwrap();

        let t = scene.world_translation(child).unwrap();
        assert!((t - DVec3::new(5.0, 1.0, 0.0)).length() < 1e-9);

        // Scene-hierarchy parenting must not affect transforms.
        scene.reparent(&[child], parent).unwrap();
        let t = scene.world_translation(child).unwrap();
        assert!((t - DVec3::new(5.0, 1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn mult_matrix_applies_slot_zero_first() {
        let mut scene = MemoryScene::new();
        let a = locator(&mut scene, "a");
        scene
            .set_local_translation(a, DVec3::new(1.0, 0.0, 0.0))
            .unwrap();
        let b = locator(&mut scene, "b");
        scene
            .set_local_rotation(b, DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2))
            .unwrap();

        let product = scene
            .create_node(kinds::MULT_MATRIX, "product", AttrMap::new())
            .unwrap();
        scene
            .connect(a, plugs::WORLD_MATRIX, product, &plugs::matrix_in(0), false)
            .unwrap();
        scene
            .connect(b, plugs::WORLD_MATRIX, product, &plugs::matrix_in(1), false)
            .unwrap();

        // Translate by (1,0,0) first, then rotate 90 degrees about Z:
        // the unit X offset ends up on +Y.
        let t = mat_translation(scene.output_matrix(product).unwrap());
        assert!((t - DVec3::new(0.0, 1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn aim_matrix_builds_orthonormal_frame() {
        let mut scene = MemoryScene::new();
        let origin = locator(&mut scene, "origin");
        let primary = locator(&mut scene, "primary");
        scene
            .set_local_translation(primary, DVec3::new(0.0, -3.0, 0.0))
            .unwrap();
        let secondary = locator(&mut scene, "secondary");
        scene
            .set_local_translation(secondary, DVec3::new(0.0, 0.0, 2.0))
            .unwrap();

        let aim = scene
            .create_node(
                kinds::AIM_MATRIX,
                "aim",
                attr_map([("primary_axis_x", 1.0)]),
            )
            .unwrap();
        scene
            .connect(origin, plugs::WORLD_MATRIX, aim, plugs::INPUT_MATRIX, false)
            .unwrap();
        scene
            .connect(
                primary,
                plugs::WORLD_MATRIX,
                aim,
                plugs::PRIMARY_TARGET_MATRIX,
                false,
            )
            .unwrap();
        scene
            .connect(
                secondary,
                plugs::WORLD_MATRIX,
                aim,
                plugs::SECONDARY_TARGET_MATRIX,
                false,
            )
            .unwrap();

        let m = scene.output_matrix(aim).unwrap();
        let x = m.x_axis.truncate();
        let y = m.y_axis.truncate();
        let z = m.z_axis.truncate();
        assert!((x - DVec3::new(0.0, -1.0, 0.0)).length() < 1e-9);
        assert!((y - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-9);
        assert!((x.dot(y)).abs() < 1e-9);
        assert!((x.cross(y) - z).length() < 1e-9);
    }

    #[test]
    fn evaluation_detects_cycles() {
        let mut scene = MemoryScene::new();
        let a = locator(&mut scene, "a");
        let b = locator(&mut scene, "b");
        scene
            .connect(a, plugs::WORLD_MATRIX, b, plugs::OFFSET_PARENT_MATRIX, false)
            .unwrap();
        scene
            .connect(b, plugs::WORLD_MATRIX, a, plugs::OFFSET_PARENT_MATRIX, false)
            .unwrap();
        assert!(matches!(
            scene.world_matrix(a),
            Err(SceneError::EvaluationCycle { .. })
        ));
    }

    #[test]
    fn delete_removes_nodes_and_connections() {
        let mut scene = MemoryScene::new();
        let a = locator(&mut scene, "a");
        let b = locator(&mut scene, "b");
        scene
            .connect(a, plugs::WORLD_MATRIX, b, plugs::OFFSET_PARENT_MATRIX, false)
            .unwrap();

        scene.delete(&[a]).unwrap();
        assert!(!scene.exists(a));
        assert_eq!(scene.connection_source(b, plugs::OFFSET_PARENT_MATRIX), None);
        assert!(matches!(
            scene.delete(&[a]),
            Err(SceneError::NodeNotFound { .. })
        ));

        // The freed name is available again.
        assert!(scene.create_locator("a", AttrMap::new()).is_ok());
    }

    #[test]
    fn dump_is_deterministic() {
        let mut scene = MemoryScene::new();
        let b = locator(&mut scene, "b");
        let a = locator(&mut scene, "a");
        scene.reparent(&[a], b).unwrap();

        let dump = scene.dump();
        assert_eq!(dump.nodes[0].name, "a");
        assert_eq!(dump.nodes[0].parent.as_deref(), Some("b"));
        assert_eq!(dump.nodes[1].name, "b");

        let json = serde_json::to_string(&dump).unwrap();
        let back: SceneDump = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dump);
    }
}
