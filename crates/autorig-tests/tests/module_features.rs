//! Module/feature composition behavior, including pinned known behaviors.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p autorig-tests --test module_features
//! ```

use autorig_core::persist::read_features;
use autorig_core::setup::find_joint;
use autorig_core::tags::{feature_type, node_tags};
use autorig_core::{JointRole, LinkId, RigWarning};
use autorig_scene::{plugs, SceneGraph};
use autorig_tests::fixtures::{assert_vec_eq, feature_count, leg_scene};
use pretty_assertions::assert_eq;

/// An unsupported feature name yields a warning and performs zero scene
/// writes.
#[test]
fn unsupported_feature_warns_without_scene_writes() {
    let (mut scene, leg) = leg_scene();
    let before = scene.live_node_count();

    let warning = leg.add_feature(&mut scene, "stretchy").unwrap();
    assert_eq!(
        warning,
        Some(RigWarning::UnsupportedFeature {
            module_type: "human_leg".to_string(),
            feature: "stretchy".to_string(),
        })
    );
    assert_eq!(scene.live_node_count(), before);

    // Removal resolves the same way.
    let warning = leg.remove_feature(&mut scene, "stretchy").unwrap();
    assert!(matches!(
        warning,
        Some(RigWarning::UnsupportedFeature { .. })
    ));
    assert_eq!(scene.live_node_count(), before);
}

/// Applying the same single feature twice builds two independent full node
/// sets. Known behavior, pinned: addition is not idempotent.
#[test]
fn double_add_builds_two_independent_node_sets() {
    let (mut scene, leg) = leg_scene();
    assert!(leg.add_feature(&mut scene, "fk").unwrap().is_none());
    assert!(leg.add_feature(&mut scene, "fk").unwrap().is_none());

    let module = leg.name();
    assert_eq!(feature_count(&scene, module, feature_type::FK_ROOT), 2);
    assert_eq!(feature_count(&scene, module, feature_type::FK_GUIDE), 6);
    assert_eq!(feature_count(&scene, module, feature_type::FK_CONTROL), 6);
    assert_eq!(feature_count(&scene, module, feature_type::FK_JOINT), 6);

    // The persisted list still records the feature once.
    let features = read_features(&scene, module).unwrap();
    assert_eq!(features.iter().collect::<Vec<_>>(), vec!["fk"]);
}

/// Adding a feature records it; removing it tears the network down and
/// deletes the persisted entry symmetrically.
#[test]
fn remove_feature_undoes_what_addition_recorded() {
    let (mut scene, leg) = leg_scene();
    let module = leg.name();

    assert!(leg.add_feature(&mut scene, "fk").unwrap().is_none());
    assert!(read_features(&scene, module).unwrap().contains("fk"));
    assert!(feature_count(&scene, module, feature_type::FK_CONTROL) > 0);

    assert!(leg.remove_feature(&mut scene, "fk").unwrap().is_none());
    assert!(!read_features(&scene, module).unwrap().contains("fk"));
    for tag in feature_type::ALL_FK {
        assert_eq!(feature_count(&scene, module, tag), 0, "tag {}", tag);
    }
}

/// FK attachment drives each driver joint from the FK joint sharing its
/// link identifier.
#[test]
fn fk_attach_drives_the_driver_joints() {
    let (mut scene, leg) = leg_scene();
    assert!(leg.add_feature(&mut scene, "fk").unwrap().is_none());

    for id in leg.id_list() {
        let driver = find_joint(&scene, id, JointRole::Driver).unwrap();
        let source = scene.connection_source(driver, plugs::OFFSET_PARENT_MATRIX);
        let (fk_joint, src_attr) = source.expect("driver joint should be driven");
        assert_eq!(src_attr, plugs::WORLD_MATRIX);
        assert_eq!(
            scene.node_name(fk_joint).unwrap(),
            format!("{}_fk_joint", id)
        );
    }
}

/// The foot roll multi-feature creates exactly the configured pivots, at
/// the terminal driver joint, and records itself like any other feature.
#[test]
fn foot_roll_creates_configured_pivots() {
    let (mut scene, leg) = leg_scene();
    let module = leg.name();

    assert!(leg.add_feature(&mut scene, "foot_roll").unwrap().is_none());

    let pivots = scene.find_all(&node_tags(module, feature_type::FOOT_ROLL_PIVOT));
    // The built-in leg config enables the ball pivot only.
    assert_eq!(pivots.len(), 1);
    assert_eq!(
        scene.node_name(pivots[0]).unwrap(),
        "human_leg_L_ball_roll_pivot"
    );

    let terminal = LinkId::new("leg_L_3").unwrap();
    let terminal_driver = find_joint(&scene, &terminal, JointRole::Driver).unwrap();
    assert_vec_eq(
        scene.world_translation(pivots[0]).unwrap(),
        scene.world_translation(terminal_driver).unwrap(),
    );

    assert!(read_features(&scene, module).unwrap().contains("foot_roll"));
}

/// Module scaffolding produces the three containers and one driver joint
/// per identifier, parented for organization.
#[test]
fn create_module_scaffolds_containers_and_drivers() {
    let (scene, leg) = leg_scene();
    let module = leg.name();

    assert_eq!(feature_count(&scene, module, feature_type::GUIDE_GROUP), 1);
    assert_eq!(feature_count(&scene, module, feature_type::JOINT_GROUP), 1);
    assert_eq!(
        feature_count(&scene, module, feature_type::CONTROL_GROUP),
        1
    );
    assert_eq!(
        feature_count(&scene, module, feature_type::DRIVER_JOINT),
        3
    );
    assert_eq!(feature_count(&scene, module, feature_type::MODULE_ROOT), 1);
}
