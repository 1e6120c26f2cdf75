//! Serializable scene description
//!
//! The description mirrors what a scene importer hands over: a nested node
//! tree with local transforms, a mesh list with named bones, and a list of
//! animations whose channels refer to nodes by name. glam types use their
//! array representation (`Vec3` as `[x, y, z]`, `Quat` as `[x, y, z, w]`,
//! `Mat4` as 16 column-major floats).
//!
//! ```json
//! {
//!   "root": {
//!     "name": "root",
//!     "children": [
//!       { "name": "hip", "transform": { "translation": [0, 1, 0] }, "meshes": [0] }
//!     ]
//!   },
//!   "meshes": [{ "name": "body", "vertex_count": 3, "bones": [{ "name": "hip" }] }],
//!   "animations": [{ "name": "idle", "duration": 10, "ticks_per_second": 25, "channels": [] }]
//! }
//! ```

use glam::{Mat4, Quat, Vec3};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::animation::{Animation, try_normalize_rotation};
use crate::mesh::Mesh;

/// Top level scene description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub root: NodeDescription,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub animations: Vec<Animation>,
}

/// One node of the nested hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub transform: TransformDescription,
    #[serde(default)]
    pub meshes: Vec<usize>,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

impl NodeDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = TransformDescription::Matrix(transform);
        self
    }

    pub fn with_mesh(mut self, mesh_index: usize) -> Self {
        self.meshes.push(mesh_index);
        self
    }

    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// Local transform, either as a full matrix or as separate components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformDescription {
    Matrix(Mat4),
    Components {
        #[serde(default)]
        translation: Vec3,
        #[serde(default)]
        rotation: Quat,
        #[serde(default = "unit_scale")]
        scale: Vec3,
    },
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self::Matrix(Mat4::IDENTITY)
    }
}

impl TransformDescription {
    /// Resolve to a matrix (translation * rotation * scale)
    ///
    /// A zero-length or non-finite rotation is replaced by identity.
    pub fn to_matrix(&self) -> Mat4 {
        match *self {
            Self::Matrix(m) => m,
            Self::Components {
                translation,
                rotation,
                scale,
            } => {
                let unit = try_normalize_rotation(rotation).unwrap_or_else(|| {
                    warn!("Degenerate rotation {rotation} in node transform, using identity");
                    Quat::IDENTITY
                });
                Mat4::from_scale_rotation_translation(scale, unit, translation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_transform() {
        let desc: TransformDescription =
            serde_json::from_str(r#"{ "translation": [1.0, 2.0, 3.0] }"#).unwrap();
        let m = desc.to_matrix();
        let p = m.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    }

    #[test]
    fn test_matrix_transform() {
        let json = "[2,0,0,0, 0,2,0,0, 0,0,2,0, 0,0,0,1]";
        let desc: TransformDescription = serde_json::from_str(json).unwrap();
        let p = desc.to_matrix().transform_point3(Vec3::ONE);
        assert!(p.abs_diff_eq(Vec3::splat(2.0), 1e-6));
    }

    #[test]
    fn test_zero_rotation_falls_back_to_identity() {
        let desc: TransformDescription = serde_json::from_str(
            r#"{ "translation": [1.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 0.0] }"#,
        )
        .unwrap();
        let m = desc.to_matrix();
        assert!(m.is_finite());
        assert!(m.abs_diff_eq(Mat4::from_translation(Vec3::X), 1e-6));
    }

    #[test]
    fn test_zero_rotation_keeps_scene_finite() {
        let json = r#"{
            "root": {
                "name": "root",
                "children": [{
                    "name": "a",
                    "transform": { "rotation": [0.0, 0.0, 0.0, 0.0] },
                    "children": [{ "name": "b", "transform": { "translation": [0.0, 2.0, 0.0] } }]
                }]
            }
        }"#;
        let scene = crate::Scene::from_json_str(json).unwrap();
        let b = crate::SceneIndex::build(&scene).get("b").unwrap();
        let global = scene.global_transform(b);
        assert!(global.is_finite());
        assert!(global.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)), 1e-6));
    }

    #[test]
    fn test_default_is_identity() {
        let node: NodeDescription = serde_json::from_str(r#"{ "name": "n" }"#).unwrap();
        assert_eq!(node.transform.to_matrix(), Mat4::IDENTITY);
        assert!(node.children.is_empty());
    }
}
