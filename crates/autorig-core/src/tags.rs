//! Attribute vocabulary shared by module scaffolding, features, and queries.
//!
//! Every node the toolset creates carries metadata attributes: the owning
//! module instance, a feature-type tag naming the node's role, and optional
//! logical-identifier tags. Queries (`find_single`/`find_all`) resolve nodes
//! by these attributes rather than by name or hierarchy.

use autorig_scene::{AttrMap, AttrValue};

use crate::ids::ModuleName;

/// Attribute names.
pub mod attr {
    /// Owning module instance name, present on every generated node.
    pub const MODULE_PARENT: &str = "module_parent";
    /// Role tag naming what the node is for (see [`super::feature_type`]).
    pub const FEATURE_TYPE: &str = "feature_type";
    /// Logical link identifier on joints.
    pub const JOINT_ID: &str = "joint_id";
    /// Logical link identifier on controls.
    pub const CONTROL_ID: &str = "control_id";

    /// Instance name, on the module root group only.
    pub const MODULE_INSTANCE: &str = "module_instance";
    /// Registered type name, on the module root group only.
    pub const MODULE_TYPE: &str = "module_type";
    /// Persisted feature-name list (semicolon-delimited).
    pub const MODULE_FEATURES: &str = "module_features";
    /// Persisted upstream module reference (semicolon-delimited).
    pub const INPUT_MODULE: &str = "input_module";
    /// Persisted downstream module list (semicolon-delimited).
    pub const OUTPUT_MODULES: &str = "output_modules";
    /// Identifier on the upstream module this module attaches to.
    pub const ATTACH_POINT: &str = "attach_point";

    /// Display visibility flag.
    pub const VISIBILITY: &str = "visibility";
}

/// Values of the [`attr::FEATURE_TYPE`] tag.
pub mod feature_type {
    pub const BIND_JOINT: &str = "bind_joint";
    pub const DRIVER_JOINT: &str = "driver_joint";
    pub const MODULE_ROOT: &str = "module_root";
    pub const GUIDE_GROUP: &str = "guide_group";
    pub const JOINT_GROUP: &str = "joint_group";
    pub const CONTROL_GROUP: &str = "control_group";

    pub const FK_ROOT: &str = "fk_root";
    pub const FK_GUIDE: &str = "fk_guide";
    pub const FK_CONTROL: &str = "fk_control";
    pub const FK_JOINT: &str = "fk_joint";
    pub const FK_PRIMARY_AIM: &str = "fk_primary_aim";
    pub const FK_SECONDARY_AIM: &str = "fk_secondary_aim";
    pub const FK_AIM_MATRIX: &str = "fk_aim_matrix";
    pub const FK_AIM_INVERSE: &str = "fk_aim_inverse_matrix";
    pub const FK_PARENT_OFFSET: &str = "fk_parent_offset_matrix";
    pub const FK_WORLD: &str = "fk_world_matrix";

    pub const FOOT_ROLL_PIVOT: &str = "foot_roll_pivot";

    /// Every tag the FK feature generates, in creation order. Used by
    /// feature removal.
    pub const ALL_FK: &[&str] = &[
        FK_ROOT,
        FK_GUIDE,
        FK_CONTROL,
        FK_JOINT,
        FK_PRIMARY_AIM,
        FK_SECONDARY_AIM,
        FK_AIM_MATRIX,
        FK_AIM_INVERSE,
        FK_PARENT_OFFSET,
        FK_WORLD,
    ];
}

/// Builds the standard metadata bag for a module-owned node.
pub fn node_tags(module: &ModuleName, feature_type: &str) -> AttrMap {
    let mut attrs = AttrMap::new();
    attrs.insert(
        attr::MODULE_PARENT.to_string(),
        AttrValue::from(module.instance()),
    );
    attrs.insert(
        attr::FEATURE_TYPE.to_string(),
        AttrValue::from(feature_type),
    );
    attrs
}

/// Query predicate matching all nodes of one feature type under a module.
pub fn feature_predicate(module: &ModuleName, feature_type: &str) -> AttrMap {
    node_tags(module, feature_type)
}
