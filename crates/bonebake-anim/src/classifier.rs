//! Bone and channel classification
//!
//! Decides, for one animation, which nodes are driven by a channel and
//! which nodes act as skin bones of the requested meshes.

use bonebake_scene::{Animation, NodeId, Scene, SceneIndex};
use log::warn;
use std::collections::HashMap;

use crate::error::{AnimError, Result};

/// Node to channel assignment for one animation
#[derive(Debug, Clone, Default)]
pub struct ChannelMap {
    by_node: HashMap<NodeId, usize>,
    /// `(channel index, node)` in channel order
    order: Vec<(usize, NodeId)>,
}

impl ChannelMap {
    /// Index of the channel driving the node
    pub fn channel_for(&self, node: NodeId) -> Option<usize> {
        self.by_node.get(&node).copied()
    }

    /// Check whether a channel drives the node
    pub fn is_animated(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    /// Accepted `(channel index, node)` pairs in channel order
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Resolve every channel of the animation to a node
///
/// Channels naming an unknown node are skipped. When several channels name
/// the same node the first one is kept.
pub fn classify_channels(animation: &Animation, index: &SceneIndex) -> ChannelMap {
    let mut map = ChannelMap::default();

    for (channel_index, channel) in animation.channels.iter().enumerate() {
        let Some(node) = index.get(&channel.node_name) else {
            warn!(
                "Animation '{}': channel {} targets unknown node '{}', skipping",
                animation.name, channel_index, channel.node_name
            );
            continue;
        };

        if let Some(&kept) = map.by_node.get(&node) {
            warn!(
                "Animation '{}': channel {} targets node '{}' already driven by channel {}, skipping",
                animation.name, channel_index, channel.node_name, kept
            );
            continue;
        }

        map.by_node.insert(node, channel_index);
        map.order.push((channel_index, node));
    }

    map
}

/// A mesh bone resolved to its scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneBinding {
    pub bone_index: usize,
    pub node: NodeId,
}

/// Resolve the bones of one mesh to scene nodes, in bone order
///
/// Bones naming an unknown node are skipped with a warning. Two bones of
/// the same mesh resolving to one node is an error, since both would claim
/// the same evaluated transform.
pub fn resolve_mesh_bones(
    scene: &Scene,
    index: &SceneIndex,
    mesh_index: usize,
) -> Result<Vec<BoneBinding>> {
    let mesh = scene
        .mesh(mesh_index)
        .ok_or(AnimError::MeshIndexOutOfRange {
            index: mesh_index,
            count: scene.mesh_count(),
        })?;

    let mut seen: HashMap<NodeId, usize> = HashMap::with_capacity(mesh.bones.len());
    let mut bindings = Vec::with_capacity(mesh.bones.len());

    for (bone_index, bone) in mesh.bones.iter().enumerate() {
        let Some(node) = index.get(&bone.name) else {
            warn!(
                "Mesh {} ('{}'): bone {} names unknown node '{}', skipping",
                mesh_index, mesh.name, bone_index, bone.name
            );
            continue;
        };

        if let Some(&first_bone) = seen.get(&node) {
            return Err(AnimError::DuplicateBoneTarget {
                mesh_index,
                node: bone.name.clone(),
                first_bone,
                second_bone: bone_index,
            });
        }
        seen.insert(node, bone_index);
        bindings.push(BoneBinding { bone_index, node });
    }

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonebake_scene::{Bone, Channel, Mesh, NodeDescription, SceneDescription};
    use glam::Mat4;
    use pretty_assertions::assert_eq;

    fn scene(bones: &[&str], channels: &[&str]) -> Scene {
        let desc = SceneDescription {
            root: NodeDescription::new("root")
                .with_child(NodeDescription::new("a").with_child(NodeDescription::new("b")))
                .with_child(NodeDescription::new("skin").with_mesh(0)),
            meshes: vec![Mesh {
                name: "body".to_string(),
                vertex_count: 0,
                bones: bones.iter().map(|b| Bone::new(*b, Mat4::IDENTITY)).collect(),
            }],
            animations: vec![Animation {
                name: "anim".to_string(),
                duration: 1.0,
                ticks_per_second: 1.0,
                channels: channels.iter().map(|c| Channel::new(*c)).collect(),
            }],
        };
        Scene::from_description(desc).unwrap()
    }

    #[test]
    fn test_unknown_and_duplicate_channels_are_skipped() {
        let scene = scene(&[], &["b", "ghost", "a", "b"]);
        let index = SceneIndex::build(&scene);
        let map = classify_channels(scene.animation(0).unwrap(), &index);

        let pairs: Vec<(usize, String)> = map
            .iter()
            .map(|(c, n)| (c, scene.node(n).unwrap().name.clone()))
            .collect();
        assert_eq!(pairs, vec![(0, "b".to_string()), (2, "a".to_string())]);
        assert_eq!(map.channel_for(index.get("b").unwrap()), Some(0));
        assert!(!map.is_animated(index.get("root").unwrap()));
    }

    #[test]
    fn test_bones_resolve_in_order() {
        let scene = scene(&["b", "missing", "a"], &[]);
        let index = SceneIndex::build(&scene);
        let bindings = resolve_mesh_bones(&scene, &index, 0).unwrap();
        let bone_indices: Vec<usize> = bindings.iter().map(|b| b.bone_index).collect();
        assert_eq!(bone_indices, vec![0, 2]);
        assert_eq!(bindings[1].node, index.get("a").unwrap());
    }

    #[test]
    fn test_duplicate_bone_target() {
        let scene = scene(&["a", "b", "a"], &[]);
        let index = SceneIndex::build(&scene);
        let err = resolve_mesh_bones(&scene, &index, 0).unwrap_err();
        assert!(matches!(
            err,
            AnimError::DuplicateBoneTarget {
                mesh_index: 0,
                first_bone: 0,
                second_bone: 2,
                ..
            }
        ));
    }
}
