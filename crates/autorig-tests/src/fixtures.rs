//! Scene fixtures: seeded skeletons and pre-built modules.

use autorig_core::tags::{attr, feature_type, node_tags};
use autorig_core::{LinkId, Module, ModuleName, ModuleRegistry};
use autorig_scene::{kinds, AttrMap, AttrValue, MemoryScene, NodeId, SceneGraph};
use glam::{DMat4, DQuat, DVec3};

/// The left-leg identifier list the built-in `human_leg` module generates.
pub const LEG_IDS: [&str; 3] = ["leg_L_1", "leg_L_2", "leg_L_3"];

/// Creates a bind joint for a link identifier at a world position.
pub fn seed_bind_joint(
    scene: &mut MemoryScene,
    id: &str,
    position: DVec3,
    rotation: DQuat,
) -> NodeId {
    let mut attrs = AttrMap::new();
    attrs.insert(attr::JOINT_ID.to_string(), AttrValue::from(id));
    attrs.insert(
        attr::FEATURE_TYPE.to_string(),
        AttrValue::from(feature_type::BIND_JOINT),
    );
    let node = scene
        .create_node(kinds::JOINT, &format!("{}_bind", id), attrs)
        .unwrap();
    scene.set_local_translation(node, position).unwrap();
    scene.set_local_rotation(node, rotation).unwrap();
    node
}

/// Seeds the left-leg bind skeleton. The hip joint carries a non-identity
/// rotation so position-only matching has something to ignore.
pub fn seed_leg_skeleton(scene: &mut MemoryScene) {
    seed_bind_joint(
        scene,
        "leg_L_1",
        DVec3::new(1.0, 10.0, 0.0),
        DQuat::from_rotation_z(0.7),
    );
    seed_bind_joint(
        scene,
        "leg_L_2",
        DVec3::new(1.0, 5.0, 0.5),
        DQuat::IDENTITY,
    );
    seed_bind_joint(scene, "leg_L_3", DVec3::new(1.0, 0.0, 0.0), DQuat::IDENTITY);
}

/// Seeds the unsided spine bind skeleton.
pub fn seed_spine_skeleton(scene: &mut MemoryScene) {
    for (i, y) in [(1, 11.0), (2, 13.0), (3, 15.0)] {
        seed_bind_joint(
            scene,
            &format!("spine_{}", i),
            DVec3::new(0.0, y, 0.0),
            DQuat::IDENTITY,
        );
    }
}

/// A scene with the left-leg skeleton and a fully scaffolded `human_leg_L`
/// module (containers, driver joints, root guide).
pub fn leg_scene() -> (MemoryScene, Module) {
    let mut scene = MemoryScene::new();
    seed_leg_skeleton(&mut scene);
    let registry = ModuleRegistry::with_builtin_modules();
    let leg = registry.instantiate("human_leg", "L").unwrap();
    leg.create_module(&mut scene).unwrap();
    (scene, leg)
}

/// Counts the module's live nodes carrying one feature-type tag.
pub fn feature_count(scene: &MemoryScene, module: &ModuleName, tag: &str) -> usize {
    scene.find_all(&node_tags(module, tag)).len()
}

/// Scaffolds just enough of a module for direct chain builds: bind and
/// driver joints per identifier plus the module root guide. No containers.
pub fn seed_chain_scaffold(
    scene: &mut MemoryScene,
    module: &ModuleName,
    ids: &[LinkId],
    positions: &[DVec3],
) {
    for (id, &position) in ids.iter().zip(positions) {
        seed_bind_joint(scene, id.as_str(), position, DQuat::IDENTITY);

        let mut tags = node_tags(module, feature_type::DRIVER_JOINT);
        tags.insert(attr::JOINT_ID.to_string(), AttrValue::from(id.as_str()));
        let driver = scene
            .create_node(kinds::JOINT, &format!("{}_driver", id), tags)
            .unwrap();
        scene.set_local_translation(driver, position).unwrap();
    }
    scene
        .create_locator(
            &format!("{}_root", module.instance()),
            node_tags(module, feature_type::MODULE_ROOT),
        )
        .unwrap();
}

/// Asserts two matrices are element-wise equal within tolerance.
pub fn assert_mat_eq(actual: DMat4, expected: DMat4) {
    let a = actual.to_cols_array();
    let e = expected.to_cols_array();
    for (i, (x, y)) in a.iter().zip(e.iter()).enumerate() {
        assert!(
            (x - y).abs() < 1e-9,
            "matrices differ at element {}: {} vs {}\nactual: {:?}\nexpected: {:?}",
            i,
            x,
            y,
            a,
            e
        );
    }
}

/// Asserts two vectors are equal within tolerance.
pub fn assert_vec_eq(actual: DVec3, expected: DVec3) {
    assert!(
        (actual - expected).length() < 1e-9,
        "vectors differ: {:?} vs {:?}",
        actual,
        expected
    );
}
