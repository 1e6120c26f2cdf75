//! Name lookup for scene nodes

use log::warn;
use std::collections::HashMap;

use crate::node::NodeId;
use crate::scene::Scene;

/// Map from node name to node id
///
/// Node names are not guaranteed to be unique. When two nodes share a name
/// the one visited later in pre-order wins and a warning is logged.
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    by_name: HashMap<String, NodeId>,
}

impl SceneIndex {
    /// Index every node of the scene by name
    pub fn build(scene: &Scene) -> Self {
        let mut by_name = HashMap::with_capacity(scene.node_count());
        for (id, node) in scene.iter_nodes() {
            if let Some(previous) = by_name.insert(node.name.clone(), id) {
                warn!(
                    "Duplicate node name '{}' ({} and {}), lookups resolve to {}",
                    node.name, previous, id, id
                );
            }
        }
        Self { by_name }
    }

    /// Node id for `name`
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
