//! Imported scene: node arena, meshes and animations

use glam::{Mat4, UVec4, Vec4};
use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::animation::Animation;
use crate::description::{NodeDescription, SceneDescription};
use crate::error::{Result, SceneError};
use crate::mesh::Mesh;
use crate::node::{Node, NodeId};

/// Maximum number of bone influences packed per vertex
pub const MAX_INFLUENCES_PER_VERTEX: usize = 4;

/// An imported scene
///
/// Nodes live in a flat arena in pre-order, so the root is always at
/// [`NodeId::ROOT`] and every parent is stored before its children. The
/// scene is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    animations: Vec<Animation>,
}

impl Scene {
    /// Flatten a nested description into a scene
    pub fn from_description(description: SceneDescription) -> Result<Self> {
        let SceneDescription {
            root,
            meshes,
            animations,
        } = description;
        let mesh_count = meshes.len();

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            for bone in &mesh.bones {
                if let Some(w) = bone.weights.iter().find(|w| w.vertex as usize >= mesh.vertex_count) {
                    return Err(SceneError::InvalidVertexReference {
                        bone: bone.name.clone(),
                        mesh_index,
                        vertex: w.vertex,
                        vertex_count: mesh.vertex_count,
                    });
                }
            }
        }

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<(NodeDescription, Option<NodeId>)> = vec![(root, None)];

        while let Some((desc, parent)) = stack.pop() {
            if let Some(&mesh_index) = desc.meshes.iter().find(|&&m| m >= mesh_count) {
                return Err(SceneError::InvalidMeshReference {
                    node: desc.name,
                    mesh_index,
                    mesh_count,
                });
            }

            let id = NodeId(nodes.len());
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }
            nodes.push(Node {
                name: desc.name,
                transform: desc.transform.to_matrix(),
                parent,
                children: Vec::new(),
                meshes: desc.meshes,
            });

            // Reversed so the first child is popped first (pre-order)
            for child in desc.children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        debug!(
            "Built scene with {} nodes, {} meshes, {} animations",
            nodes.len(),
            meshes.len(),
            animations.len()
        );

        Ok(Self {
            nodes,
            meshes,
            animations,
        })
    }

    /// Parse a JSON scene description
    pub fn from_json_str(json: &str) -> Result<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        Self::from_description(description)
    }

    /// Parse a YAML scene description
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let description: SceneDescription = serde_yaml_ng::from_str(yaml)?;
        Self::from_description(description)
    }

    /// Load a scene description from disk, choosing the parser by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Self::from_yaml_str(&fs::read_to_string(path)?),
            _ => Err(SceneError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// The root node id
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All nodes in pre-order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterate `(id, node)` pairs in pre-order
    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All meshes in scene order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mesh by scene index
    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Walk the parent chain of a node, nearest ancestor first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.node(id).and_then(|n| n.parent),
        }
    }

    /// Accumulated transform from the root down to (and including) the node
    pub fn global_transform(&self, id: NodeId) -> Mat4 {
        let local = self.node(id).map_or(Mat4::IDENTITY, |n| n.transform);
        self.ancestors(id)
            .fold(local, |acc, (_, parent)| parent.transform * acc)
    }

    /// Accumulated transform of the first node (in pre-order) that carries the mesh
    ///
    /// Returns `None` when no node references the mesh.
    pub fn transformation_matrix_for_mesh(&self, mesh_index: usize) -> Option<Mat4> {
        self.iter_nodes()
            .find(|(_, n)| n.meshes.contains(&mesh_index))
            .map(|(id, _)| self.global_transform(id))
    }

    pub fn name_of_mesh(&self, mesh_index: usize) -> Result<&str> {
        self.checked_mesh(mesh_index).map(|m| m.name.as_str())
    }

    pub fn number_of_vertices_for_mesh(&self, mesh_index: usize) -> Result<usize> {
        self.checked_mesh(mesh_index).map(|m| m.vertex_count)
    }

    /// Indices of all meshes in the scene
    pub fn select_all_meshes(&self) -> Vec<usize> {
        (0..self.meshes.len()).collect()
    }

    /// Indices of all meshes with the given name
    pub fn find_mesh_indices_by_name(&self, name: &str) -> Vec<usize> {
        self.meshes
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-vertex bone weights, at most four influences in bone order
    ///
    /// Meshes without bones yield `(1, 0, 0, 0)` for every vertex.
    pub fn bone_weights_for_mesh(&self, mesh_index: usize) -> Result<Vec<Vec4>> {
        let mesh = self.checked_mesh(mesh_index)?;
        if !mesh.has_bones() {
            warn!(
                "The mesh at index {} does not contain bone weights. Will return (1,0,0,0) bone weights for each vertex.",
                mesh_index
            );
            return Ok(vec![Vec4::X; mesh.vertex_count]);
        }

        Ok(mesh
            .influences_per_vertex()
            .iter()
            .map(|influences| {
                let mut weights = [0.0f32; MAX_INFLUENCES_PER_VERTEX];
                for (slot, &(_, weight)) in weights.iter_mut().zip(influences) {
                    *slot = weight;
                }
                Vec4::from_array(weights)
            })
            .collect())
    }

    /// Per-vertex bone indices, aligned with [`Self::bone_weights_for_mesh`]
    ///
    /// Meshes without bones yield `(0, 0, 0, 0)` for every vertex.
    pub fn bone_indices_for_mesh(&self, mesh_index: usize) -> Result<Vec<UVec4>> {
        let mesh = self.checked_mesh(mesh_index)?;
        if !mesh.has_bones() {
            warn!(
                "The mesh at index {} does not contain bone weights. Will return (0,0,0,0) bone indices for each vertex.",
                mesh_index
            );
            return Ok(vec![UVec4::ZERO; mesh.vertex_count]);
        }

        Ok(mesh
            .influences_per_vertex()
            .iter()
            .map(|influences| {
                let mut indices = [0u32; MAX_INFLUENCES_PER_VERTEX];
                for (slot, &(bone, _)) in indices.iter_mut().zip(influences) {
                    *slot = bone;
                }
                UVec4::from_array(indices)
            })
            .collect())
    }

    /// Concatenated bone weights of several meshes
    pub fn bone_weights_for_meshes(&self, mesh_indices: &[usize]) -> Result<Vec<Vec4>> {
        let mut result = Vec::new();
        for &mesh_index in mesh_indices {
            result.extend(self.bone_weights_for_mesh(mesh_index)?);
        }
        Ok(result)
    }

    /// Concatenated bone indices of several meshes
    pub fn bone_indices_for_meshes(&self, mesh_indices: &[usize]) -> Result<Vec<UVec4>> {
        let mut result = Vec::new();
        for &mesh_index in mesh_indices {
            result.extend(self.bone_indices_for_mesh(mesh_index)?);
        }
        Ok(result)
    }

    fn checked_mesh(&self, mesh_index: usize) -> Result<&Mesh> {
        self.meshes
            .get(mesh_index)
            .ok_or(SceneError::MeshIndexOutOfRange {
                index: mesh_index,
                count: self.meshes.len(),
            })
    }
}

/// Iterator over a node's ancestors, see [`Scene::ancestors`]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.scene.node(id)?;
        self.next = node.parent;
        Some((id, node))
    }
}
