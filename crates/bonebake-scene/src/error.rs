use std::io;
use thiserror::Error;

/// Error types for scene loading and queries
#[derive(Error, Debug)]
pub enum SceneError {
    /// I/O Error while reading a scene description
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON scene description
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML scene description
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// File extension does not name a supported description format
    #[error("Unsupported scene format: {0}")]
    UnsupportedFormat(String),

    /// A node references a mesh that does not exist
    #[error("Node '{node}' references mesh {mesh_index}, but the scene has {mesh_count} meshes")]
    InvalidMeshReference {
        node: String,
        mesh_index: usize,
        mesh_count: usize,
    },

    /// A bone weight references a vertex outside of its mesh
    #[error("Bone '{bone}' of mesh {mesh_index} weights vertex {vertex}, but the mesh has {vertex_count} vertices")]
    InvalidVertexReference {
        bone: String,
        mesh_index: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// A mesh index passed to a query is out of range
    #[error("Mesh index {index} out of range (scene has {count} meshes)")]
    MeshIndexOutOfRange { index: usize, count: usize },
}

/// Result type using SceneError
pub type Result<T> = std::result::Result<T, SceneError>;
