//! Skinned meshes and their bones

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Influence of one bone on one vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexWeight {
    /// Vertex index within the owning mesh
    pub vertex: u32,
    pub weight: f32,
}

/// A mesh-local bone
///
/// The name resolves to a scene node; the offset matrix transforms from
/// mesh space into the bone's rest pose (inverse bind pose).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    #[serde(default)]
    pub offset_matrix: Mat4,
    #[serde(default)]
    pub weights: Vec<VertexWeight>,
}

impl Bone {
    pub fn new(name: impl Into<String>, offset_matrix: Mat4) -> Self {
        Self {
            name: name.into(),
            offset_matrix,
            weights: Vec::new(),
        }
    }
}

/// Mesh data relevant to skinning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vertex_count: usize,
    #[serde(default)]
    pub bones: Vec<Bone>,
}

impl Mesh {
    /// Check whether the mesh is skinned at all
    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }

    /// Collect `(bone index, weight)` influences for every vertex, in bone order
    pub fn influences_per_vertex(&self) -> Vec<Vec<(u32, f32)>> {
        let mut per_vertex = vec![Vec::new(); self.vertex_count];
        for (bone_index, bone) in self.bones.iter().enumerate() {
            for w in &bone.weights {
                if let Some(slot) = per_vertex.get_mut(w.vertex as usize) {
                    slot.push((bone_index as u32, w.weight));
                }
            }
        }
        per_vertex
    }
}
