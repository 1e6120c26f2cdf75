//! Scene model for skeletal animation baking
//!
//! A [`Scene`] holds what a model importer delivers: a node hierarchy with
//! local transforms, meshes whose bones refer to nodes by name, and
//! animations whose channels drive nodes by name. Scenes are built from a
//! [`SceneDescription`], usually loaded from JSON or YAML.
//!
//! ```no_run
//! use bonebake_scene::{Scene, SceneIndex};
//!
//! let scene = Scene::load("character.json")?;
//! let index = SceneIndex::build(&scene);
//! if let Some(id) = index.get("hip") {
//!     println!("hip world transform: {}", scene.global_transform(id));
//! }
//! # Ok::<(), bonebake_scene::SceneError>(())
//! ```

pub mod animation;
pub mod description;
pub mod error;
pub mod index;
pub mod mesh;
pub mod node;
pub mod scene;

pub use animation::{
    Animation, Channel, QuatKey, VectorKey, normalize_or_identity, try_normalize_rotation,
};
pub use description::{NodeDescription, SceneDescription, TransformDescription};
pub use error::{Result, SceneError};
pub use index::SceneIndex;
pub use mesh::{Bone, Mesh, VertexWeight};
pub use node::{Node, NodeId};
pub use scene::{Ancestors, MAX_INFLUENCES_PER_VERTEX, Scene};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
