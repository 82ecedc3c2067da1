//! Persisted module state.
//!
//! Durable bookkeeping lives on the module root node as semicolon-delimited
//! string attributes, the wire format external tooling (template save/load,
//! editors) reads. In memory the lists are typed: ordered, duplicate-free,
//! validated when parsed. All mutation goes through the [`crate::Module`]
//! contract.

use std::sync::OnceLock;

use autorig_scene::{AttrValue, NodeId, SceneGraph};
use regex::Regex;

use crate::error::RigError;
use crate::ids::ModuleName;
use crate::tags::attr;

const SEPARATOR: char = ';';

fn entry_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap())
}

/// An ordered, duplicate-free list persisted as a semicolon-delimited string.
///
/// Used for both the feature-name list and module-reference lists; entries
/// share one lexical shape (a leading letter, then letters/digits/
/// underscores).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedList {
    entries: Vec<String>,
}

impl PersistedList {
    /// Parses the wire format, validating every entry. Empty segments
    /// (leading, trailing, doubled separators) are dropped; duplicates keep
    /// their first occurrence; a malformed entry fails the read.
    pub fn parse(raw: &str, what: &'static str) -> Result<Self, RigError> {
        let mut list = PersistedList::default();
        for segment in raw.split(SEPARATOR) {
            if segment.is_empty() {
                continue;
            }
            if !entry_pattern().is_match(segment) {
                return Err(RigError::InvalidIdentifier {
                    what,
                    value: segment.to_string(),
                });
            }
            list.push(segment);
        }
        Ok(list)
    }

    /// Renders the wire format.
    pub fn encode(&self) -> String {
        self.entries.join(&SEPARATOR.to_string())
    }

    /// Appends an entry, ignoring duplicates. Returns whether the list
    /// changed.
    pub fn push(&mut self, entry: &str) -> bool {
        if self.entries.iter().any(|e| e == entry) {
            false
        } else {
            self.entries.push(entry.to_string());
            true
        }
    }

    /// Removes an entry. Returns whether it was present.
    pub fn remove(&mut self, entry: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != entry);
        self.entries.len() != before
    }

    /// Whether the entry is present.
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves the module root group for an instance. Exactly one node carries
/// the instance tag; anything else is a configuration defect upstream.
pub fn module_root(scene: &dyn SceneGraph, module: &ModuleName) -> Result<NodeId, RigError> {
    let mut predicate = autorig_scene::AttrMap::new();
    predicate.insert(
        attr::MODULE_INSTANCE.to_string(),
        AttrValue::from(module.instance()),
    );
    Ok(scene.find_single(&predicate)?)
}

fn read_list(
    scene: &dyn SceneGraph,
    root: NodeId,
    attr_name: &str,
    what: &'static str,
) -> Result<PersistedList, RigError> {
    let raw = scene
        .get_attr(root, attr_name)?
        .and_then(AttrValue::as_str)
        .unwrap_or("");
    PersistedList::parse(raw, what)
}

fn write_list(
    scene: &mut dyn SceneGraph,
    root: NodeId,
    attr_name: &str,
    list: &PersistedList,
) -> Result<(), RigError> {
    scene.set_attr(root, attr_name, AttrValue::from(list.encode()))?;
    Ok(())
}

/// Reads the persisted feature-name list.
pub fn read_features(
    scene: &dyn SceneGraph,
    module: &ModuleName,
) -> Result<PersistedList, RigError> {
    let root = module_root(scene, module)?;
    read_list(scene, root, attr::MODULE_FEATURES, "feature name")
}

/// Appends a feature name to the persisted list.
pub fn append_feature(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    feature: &str,
) -> Result<(), RigError> {
    let root = module_root(scene, module)?;
    let mut list = read_list(scene, root, attr::MODULE_FEATURES, "feature name")?;
    list.push(feature);
    write_list(scene, root, attr::MODULE_FEATURES, &list)
}

/// Deletes a feature name from the persisted list. Returns whether it was
/// recorded.
pub fn remove_feature_entry(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    feature: &str,
) -> Result<bool, RigError> {
    let root = module_root(scene, module)?;
    let mut list = read_list(scene, root, attr::MODULE_FEATURES, "feature name")?;
    let removed = list.remove(feature);
    write_list(scene, root, attr::MODULE_FEATURES, &list)?;
    Ok(removed)
}

/// Reads the persisted upstream module reference list.
pub fn read_inputs(
    scene: &dyn SceneGraph,
    module: &ModuleName,
) -> Result<PersistedList, RigError> {
    let root = module_root(scene, module)?;
    read_list(scene, root, attr::INPUT_MODULE, "module reference")
}

/// Reads the persisted downstream module list.
pub fn read_outputs(
    scene: &dyn SceneGraph,
    module: &ModuleName,
) -> Result<PersistedList, RigError> {
    let root = module_root(scene, module)?;
    read_list(scene, root, attr::OUTPUT_MODULES, "module reference")
}

/// Records an upstream module reference on `module`.
pub fn append_input(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    upstream: &str,
) -> Result<(), RigError> {
    let root = module_root(scene, module)?;
    let mut list = read_list(scene, root, attr::INPUT_MODULE, "module reference")?;
    list.push(upstream);
    write_list(scene, root, attr::INPUT_MODULE, &list)
}

/// Records a downstream module reference on `module`.
pub fn append_output(
    scene: &mut dyn SceneGraph,
    module: &ModuleName,
    downstream: &str,
) -> Result<(), RigError> {
    let root = module_root(scene, module)?;
    let mut list = read_list(scene, root, attr::OUTPUT_MODULES, "module reference")?;
    list.push(downstream);
    write_list(scene, root, attr::OUTPUT_MODULES, &list)
}
