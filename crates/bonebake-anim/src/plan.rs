//! Animation plan construction
//!
//! A plan flattens one animation of a scene into an ordered list of
//! [`AnimatedNode`] records. Parents always precede their children, so the
//! evaluator can compute every global transform in a single forward pass.
//! Each record owns tidied copies of its key tracks, the product of the
//! static (channel-less) ancestor transforms between it and its animated
//! parent, and the storage slots it writes bone matrices to.

use bonebake_scene::{Animation, NodeId, QuatKey, Scene, SceneIndex, VectorKey};
use glam::{Mat4, Quat, Vec3};
use log::{debug, trace};
use std::collections::HashMap;

use crate::classifier::{ChannelMap, classify_channels, resolve_mesh_bones};
use crate::error::{AnimError, Result};
use crate::keys::{TrackKind, same_key_times, tidy_rotation_track, tidy_track};
use crate::layout::BoneMatrixLayout;

/// One bone matrix output of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTarget {
    /// Mesh space to bone rest space
    pub inverse_bind_pose: Mat4,
    /// Inverse of the global transform of the node carrying the mesh
    pub inverse_mesh_root: Mat4,
    /// Storage slot written on evaluation
    pub slot: usize,
    /// Position of the mesh in the plan's mesh list
    pub mesh_slot: usize,
    /// Bone index within the mesh
    pub bone_index: usize,
}

/// A mesh taking part in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshTarget {
    pub mesh_index: usize,
    /// First storage slot of the mesh's bone matrices
    pub base_slot: usize,
    pub bone_count: usize,
}

/// A node evaluated by the plan
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedNode {
    pub(crate) node: NodeId,
    pub(crate) name: String,
    pub(crate) channel: Option<usize>,
    pub(crate) position_keys: Vec<VectorKey>,
    pub(crate) rotation_keys: Vec<QuatKey>,
    pub(crate) scaling_keys: Vec<VectorKey>,
    pub(crate) rotation_shares_position_times: bool,
    pub(crate) scaling_shares_position_times: bool,
    pub(crate) animated_parent: Option<usize>,
    pub(crate) static_parent_transform: Mat4,
    pub(crate) bone_targets: Vec<BoneTarget>,
    pub(crate) current_transform: Mat4,
}

impl AnimatedNode {
    /// Scene node driven by this record
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Name of the driven node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel driving this node, `None` for bones added without one
    pub fn channel(&self) -> Option<usize> {
        self.channel
    }

    /// Whether the tracks come from a channel rather than being synthesized
    pub fn is_channel_driven(&self) -> bool {
        self.channel.is_some()
    }

    /// Record index of the nearest channel-driven ancestor
    pub fn animated_parent(&self) -> Option<usize> {
        self.animated_parent
    }

    /// Product of the local transforms of the static ancestors up to the animated parent
    pub fn static_parent_transform(&self) -> Mat4 {
        self.static_parent_transform
    }

    /// Bone matrices written from this record's global transform
    pub fn bone_targets(&self) -> &[BoneTarget] {
        &self.bone_targets
    }

    /// Global transform computed by the latest evaluation
    ///
    /// Before the first evaluation this is the node's rest pose global
    /// transform taken from the scene.
    pub fn current_transform(&self) -> Mat4 {
        self.current_transform
    }

    /// Tidied position track
    pub fn position_keys(&self) -> &[VectorKey] {
        &self.position_keys
    }

    /// Tidied, normalized rotation track
    pub fn rotation_keys(&self) -> &[QuatKey] {
        &self.rotation_keys
    }

    /// Tidied scaling track
    pub fn scaling_keys(&self) -> &[VectorKey] {
        &self.scaling_keys
    }

    /// Rotation keys sit at the position key times
    pub fn rotation_shares_position_times(&self) -> bool {
        self.rotation_shares_position_times
    }

    /// Scaling keys sit at the position key times
    pub fn scaling_shares_position_times(&self) -> bool {
        self.scaling_shares_position_times
    }

    /// Record for a bone node without a channel
    fn synthesized(node: NodeId, name: &str) -> Self {
        Self::with_tracks(node, name, None, &[], &[], &[])
    }

    fn from_channel(
        scene: &Scene,
        animation: &Animation,
        node: NodeId,
        channel_index: usize,
    ) -> Self {
        let name = node_name(scene, node);
        match animation.channels.get(channel_index) {
            Some(channel) => Self::with_tracks(
                node,
                name,
                Some(channel_index),
                &channel.position_keys,
                &channel.rotation_keys,
                &channel.scaling_keys,
            ),
            None => Self::with_tracks(node, name, Some(channel_index), &[], &[], &[]),
        }
    }

    fn with_tracks(
        node: NodeId,
        name: &str,
        channel: Option<usize>,
        positions: &[VectorKey],
        rotations: &[QuatKey],
        scalings: &[VectorKey],
    ) -> Self {
        let position_keys = tidy_track(
            positions,
            TrackKind::Position.default_vector(),
            name,
            TrackKind::Position,
        );
        let rotation_keys = tidy_rotation_track(rotations, name);
        let scaling_keys = tidy_track(
            scalings,
            TrackKind::Scaling.default_vector(),
            name,
            TrackKind::Scaling,
        );

        Self {
            node,
            name: name.to_string(),
            channel,
            rotation_shares_position_times: same_key_times(&position_keys, &rotation_keys),
            scaling_shares_position_times: same_key_times(&position_keys, &scaling_keys),
            position_keys,
            rotation_keys,
            scaling_keys,
            animated_parent: None,
            static_parent_transform: Mat4::IDENTITY,
            bone_targets: Vec::new(),
            current_transform: Mat4::IDENTITY,
        }
    }
}

/// Reusable, time-independent evaluation structure for one animation
#[derive(Debug, Clone)]
pub struct AnimationPlan {
    pub(crate) animation_index: usize,
    pub(crate) layout: BoneMatrixLayout,
    pub(crate) mesh_targets: Vec<MeshTarget>,
    pub(crate) records: Vec<AnimatedNode>,
    pub(crate) record_by_node: HashMap<NodeId, usize>,
}

impl AnimationPlan {
    /// Build a plan for `animation_index` driving the bones of `mesh_indices`
    ///
    /// Mesh `mesh_indices[i]` writes its bone matrices into mesh slot `i` of
    /// `layout`. Configuration is validated before anything is written; on
    /// success every storage slot owned by the plan holds the identity
    /// matrix.
    pub fn build(
        scene: &Scene,
        animation_index: usize,
        mesh_indices: &[usize],
        layout: BoneMatrixLayout,
        storage: &mut [Mat4],
    ) -> Result<Self> {
        if !scene.has_animations() {
            return Err(AnimError::NoAnimations);
        }
        let animation =
            scene
                .animation(animation_index)
                .ok_or(AnimError::AnimationIndexOutOfRange {
                    index: animation_index,
                    count: scene.animation_count(),
                })?;

        layout.validate()?;
        for &mesh_index in mesh_indices {
            let mesh = scene.mesh(mesh_index).ok_or(AnimError::MeshIndexOutOfRange {
                index: mesh_index,
                count: scene.mesh_count(),
            })?;
            if mesh.bones.len() > layout.max_bone_matrices {
                return Err(AnimError::TooManyBones {
                    mesh_index,
                    bone_count: mesh.bones.len(),
                    max_bone_matrices: layout.max_bone_matrices,
                });
            }
        }

        let required = layout.required_len(mesh_indices.len());
        if storage.len() < required {
            return Err(AnimError::StorageTooSmall {
                required,
                actual: storage.len(),
            });
        }

        let index = SceneIndex::build(scene);
        let channels = classify_channels(animation, &index);

        // Bone targets waiting for their records, in mesh order then bone order
        let mut pending: Vec<(NodeId, BoneTarget)> = Vec::new();
        let mut mesh_targets = Vec::with_capacity(mesh_indices.len());

        for (mesh_slot, &mesh_index) in mesh_indices.iter().enumerate() {
            let mesh_root = scene
                .transformation_matrix_for_mesh(mesh_index)
                .ok_or(AnimError::MeshNotInHierarchy { mesh_index })?;
            let inverse_mesh_root = mesh_root.inverse();
            if !inverse_mesh_root.is_finite() {
                return Err(AnimError::SingularMeshTransform { mesh_index });
            }
            let bones = &scene
                .mesh(mesh_index)
                .ok_or(AnimError::MeshIndexOutOfRange {
                    index: mesh_index,
                    count: scene.mesh_count(),
                })?
                .bones;

            for binding in resolve_mesh_bones(scene, &index, mesh_index)? {
                let Some(bone) = bones.get(binding.bone_index) else {
                    return Err(AnimError::Internal(format!(
                        "bone {} of mesh {} vanished during planning",
                        binding.bone_index, mesh_index
                    )));
                };
                pending.push((
                    binding.node,
                    BoneTarget {
                        inverse_bind_pose: bone.offset_matrix,
                        inverse_mesh_root,
                        slot: layout.slot(mesh_slot, binding.bone_index),
                        mesh_slot,
                        bone_index: binding.bone_index,
                    },
                ));
            }

            mesh_targets.push(MeshTarget {
                mesh_index,
                base_slot: layout.slot(mesh_slot, 0),
                bone_count: bones.len(),
            });
        }

        let mut builder = RecordBuilder::default();

        // Channel-driven nodes, each preceded by its not yet added animated ancestors
        for (channel_index, node) in channels.iter() {
            if builder.contains(node) {
                continue;
            }

            let missing: Vec<NodeId> = scene
                .ancestors(node)
                .map(|(id, _)| id)
                .filter(|&id| channels.is_animated(id) && !builder.contains(id))
                .collect();
            for &ancestor in missing.iter().rev() {
                debug!(
                    "Adding animated ancestor '{}' ahead of '{}'",
                    node_name(scene, ancestor),
                    node_name(scene, node)
                );
                builder.add_channel_node(scene, animation, &channels, ancestor)?;
            }

            builder.push(AnimatedNode::from_channel(
                scene,
                animation,
                node,
                channel_index,
            ));
        }

        // Bones whose node has no channel get synthesized identity tracks
        for (node, _) in &pending {
            if !builder.contains(*node) {
                debug!(
                    "Bone node '{}' has no channel, using synthesized key tracks",
                    node_name(scene, *node)
                );
                builder.push(AnimatedNode::synthesized(*node, node_name(scene, *node)));
            }
        }

        let RecordBuilder {
            mut records,
            by_node,
        } = builder;

        for (record_index, record) in records.iter_mut().enumerate() {
            let (animated_parent, static_parent) =
                resolve_parent(scene, &channels, &by_node, record.node)?;
            if animated_parent.is_some_and(|p| p >= record_index) {
                return Err(AnimError::Internal(format!(
                    "animated parent of '{}' is not ordered before it",
                    record.name
                )));
            }
            record.animated_parent = animated_parent;
            record.static_parent_transform = static_parent;
            record.current_transform = scene.global_transform(record.node);
            trace!(
                "Record {} '{}': animated parent {:?}",
                record_index, record.name, animated_parent
            );
        }

        for (node, target) in pending {
            let record = by_node
                .get(&node)
                .and_then(|&i| records.get_mut(i))
                .ok_or_else(|| {
                    AnimError::Internal(format!("bone node {node} has no record"))
                })?;
            record.bone_targets.push(target);
        }

        for mesh_slot in 0..mesh_indices.len() {
            if let Some(slots) = storage.get_mut(layout.slot_range(mesh_slot)) {
                slots.fill(Mat4::IDENTITY);
            }
        }

        debug!(
            "Planned animation {} ('{}'): {} records, {} meshes",
            animation_index,
            animation.name,
            records.len(),
            mesh_targets.len()
        );

        Ok(Self {
            animation_index,
            layout,
            mesh_targets,
            records,
            record_by_node: by_node,
        })
    }

    /// Records in evaluation order
    pub fn records(&self) -> &[AnimatedNode] {
        &self.records
    }

    /// Record driving `node`, if the node takes part in the plan
    pub fn record_for_node(&self, node: NodeId) -> Option<&AnimatedNode> {
        self.record_by_node
            .get(&node)
            .and_then(|&i| self.records.get(i))
    }

    /// Planned meshes in mesh slot order
    pub fn mesh_targets(&self) -> &[MeshTarget] {
        &self.mesh_targets
    }

    /// Index of the planned animation in the scene
    pub fn animation_index(&self) -> usize {
        self.animation_index
    }

    /// Storage layout the plan writes into
    pub fn layout(&self) -> BoneMatrixLayout {
        self.layout
    }

    /// Minimum storage length accepted by evaluation
    pub fn required_len(&self) -> usize {
        self.layout.required_len(self.mesh_targets.len())
    }

    /// Number of bone matrices written per evaluation
    pub fn bone_target_count(&self) -> usize {
        self.records.iter().map(|r| r.bone_targets.len()).sum()
    }

    /// Global transform of a record after the latest evaluation (rest pose before any)
    pub fn current_transform(&self, record: usize) -> Option<Mat4> {
        self.records.get(record).map(|r| r.current_transform)
    }
}

#[derive(Default)]
struct RecordBuilder {
    records: Vec<AnimatedNode>,
    by_node: HashMap<NodeId, usize>,
}

impl RecordBuilder {
    fn contains(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    fn push(&mut self, record: AnimatedNode) {
        self.by_node.insert(record.node, self.records.len());
        self.records.push(record);
    }

    fn add_channel_node(
        &mut self,
        scene: &Scene,
        animation: &Animation,
        channels: &ChannelMap,
        node: NodeId,
    ) -> Result<()> {
        let channel_index = channels.channel_for(node).ok_or_else(|| {
            AnimError::Internal(format!("animated ancestor {node} has no channel"))
        })?;
        self.push(AnimatedNode::from_channel(
            scene,
            animation,
            node,
            channel_index,
        ));
        Ok(())
    }
}

/// Nearest channel-driven ancestor and the static transform accumulated up to it
fn resolve_parent(
    scene: &Scene,
    channels: &ChannelMap,
    by_node: &HashMap<NodeId, usize>,
    node: NodeId,
) -> Result<(Option<usize>, Mat4)> {
    let mut static_parent = Mat4::IDENTITY;

    for (ancestor, ancestor_node) in scene.ancestors(node) {
        if channels.is_animated(ancestor) {
            let record = by_node.get(&ancestor).copied().ok_or_else(|| {
                AnimError::Internal(format!(
                    "animated ancestor '{}' of '{}' was never added",
                    ancestor_node.name,
                    node_name(scene, node)
                ))
            })?;
            return Ok((Some(record), static_parent));
        }
        static_parent = ancestor_node.transform * static_parent;
    }

    Ok((None, static_parent))
}

fn node_name(scene: &Scene, node: NodeId) -> &str {
    scene.node(node).map_or("", |n| n.name.as_str())
}

/// Local transform `T * R * S`
pub(crate) fn compose_local(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}
