//! Property tests for the chain node-count invariants.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p autorig-tests --test chain_property
//! ```

use autorig_core::tags::feature_type;
use autorig_core::{build_fk_chain, FkChainParams, LinkId, ModuleName};
use autorig_scene::MemoryScene;
use autorig_tests::fixtures::{feature_count, seed_chain_scaffold};
use glam::DVec3;
use proptest::prelude::*;

fn position_strategy() -> impl Strategy<Value = DVec3> {
    (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    /// For any chain length and joint placement, a kept-terminal build
    /// creates exactly N of every per-link node kind plus one root; a
    /// pruned build drops one of each of the five generated kinds.
    #[test]
    fn node_counts_hold_for_any_chain(
        positions in proptest::collection::vec(position_strategy(), 1..6),
        keep_end_control in any::<bool>(),
    ) {
        let n = positions.len();
        let mut scene = MemoryScene::new();
        let module = ModuleName::new("human_spine", "").unwrap();
        let ids: Vec<LinkId> = (1..=n)
            .map(|i| LinkId::new(format!("spine_{}", i)).unwrap())
            .collect();
        seed_chain_scaffold(&mut scene, &module, &ids, &positions);

        let chain = build_fk_chain(
            &mut scene,
            &module,
            &ids,
            FkChainParams {
                keep_end_control,
                ..FkChainParams::default()
            },
        )
        .unwrap();

        let kept = if keep_end_control { n } else { n - 1 };
        prop_assert_eq!(chain.links.len(), kept);
        prop_assert_eq!(feature_count(&scene, &module, feature_type::FK_ROOT), 1);
        for tag in [
            feature_type::FK_GUIDE,
            feature_type::FK_CONTROL,
            feature_type::FK_JOINT,
            feature_type::FK_PRIMARY_AIM,
            feature_type::FK_SECONDARY_AIM,
        ] {
            prop_assert_eq!(feature_count(&scene, &module, tag), kept, "tag {}", tag);
        }
        for tag in [
            feature_type::FK_AIM_MATRIX,
            feature_type::FK_AIM_INVERSE,
            feature_type::FK_PARENT_OFFSET,
            feature_type::FK_WORLD,
        ] {
            prop_assert_eq!(feature_count(&scene, &module, tag), n, "tag {}", tag);
        }
    }
}
