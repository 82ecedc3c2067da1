//! End-to-end orientation propagation through the evaluated network.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p autorig-tests --test chain_orientation
//! ```

use autorig_core::{build_fk_chain, AimDirection, FkChainParams, LinkId, ModuleName};
use autorig_scene::MemoryScene;
use autorig_tests::fixtures::{assert_mat_eq, leg_scene, seed_chain_scaffold};
use glam::{DQuat, DVec3};

/// With every control at rest, the accumulator chain telescopes: each
/// control's world transform equals its own orientation solver output (the
/// accumulated predecessor corrections cancel), in list order.
#[test]
fn rest_pose_controls_equal_their_solver_output() {
    let (mut scene, leg) = leg_scene();
    let chain = build_fk_chain(
        &mut scene,
        leg.name(),
        leg.id_list(),
        FkChainParams::default(),
    )
    .unwrap();

    for link in &chain.links {
        let aim = link.aim.as_ref().unwrap();
        assert_mat_eq(
            scene.world_matrix(link.control).unwrap(),
            scene.output_matrix(aim.aim_matrix).unwrap(),
        );
    }
}

/// Rotating one control propagates to every successor through the matrix
/// products alone: link i's world transform is its predecessor's world
/// transform times the predecessor's inverse correction times its own
/// solver output. No scene hierarchy is involved.
#[test]
fn control_rotation_propagates_through_accumulators() {
    let (mut scene, leg) = leg_scene();
    let chain = build_fk_chain(
        &mut scene,
        leg.name(),
        leg.id_list(),
        FkChainParams::default(),
    )
    .unwrap();

    // Pose the hip control.
    scene
        .set_local_rotation(chain.links[0].control, DQuat::from_rotation_y(0.6))
        .unwrap();

    for i in 1..chain.links.len() {
        let current = &chain.links[i];
        let previous = &chain.links[i - 1];
        let current_aim = current.aim.as_ref().unwrap();
        let previous_aim = previous.aim.as_ref().unwrap();

        let expected = scene.world_matrix(previous.control).unwrap()
            * scene.output_matrix(previous_aim.aim_inverse).unwrap()
            * scene.output_matrix(current_aim.aim_matrix).unwrap();
        assert_mat_eq(scene.world_matrix(current.control).unwrap(), expected);
    }
}

/// Moving a primary aim target re-aims the solved frame: the local X axis
/// points at the target, sign-selected by the aim direction.
#[test]
fn aim_direction_selects_the_chain_axis_sign() {
    for (direction, sign) in [(AimDirection::Positive, 1.0), (AimDirection::Negative, -1.0)] {
        let mut scene = MemoryScene::new();
        let module = ModuleName::new("human_spine", "").unwrap();
        let ids: Vec<LinkId> = (1..=2)
            .map(|i| LinkId::new(format!("spine_{}", i)).unwrap())
            .collect();
        seed_chain_scaffold(
            &mut scene,
            &module,
            &ids,
            &[DVec3::new(0.0, 11.0, 0.0), DVec3::new(0.0, 13.0, 0.0)],
        );

        let chain = build_fk_chain(
            &mut scene,
            &module,
            &ids,
            FkChainParams {
                aim_direction: direction,
                keep_end_control: true,
            },
        )
        .unwrap();

        // Re-aim the first link's primary target straight up from the link.
        let aim = chain.links[0].aim.as_ref().unwrap();
        scene
            .set_local_translation(aim.primary_target, DVec3::new(0.0, 15.0, 0.0))
            .unwrap();

        let frame = scene.output_matrix(aim.aim_matrix).unwrap();
        let x = frame.x_axis.truncate();
        let expected = DVec3::new(0.0, sign, 0.0);
        assert!(
            (x - expected).length() < 1e-9,
            "aim axis {:?} for sign {}",
            x,
            sign
        );
    }
}
