use bonebake_scene::SceneError;
use thiserror::Error;

/// Error types for animation planning and evaluation
#[derive(Error, Debug)]
pub enum AnimError {
    /// The scene carries no animations at all
    #[error("Scene contains no animations")]
    NoAnimations,

    #[error("Animation index {index} out of range (scene has {count} animations)")]
    AnimationIndexOutOfRange { index: usize, count: usize },

    #[error("Mesh index {index} out of range (scene has {count} meshes)")]
    MeshIndexOutOfRange { index: usize, count: usize },

    /// No node of the hierarchy carries the mesh
    #[error("Mesh {mesh_index} is not placed in the node hierarchy")]
    MeshNotInHierarchy { mesh_index: usize },

    /// The node carrying the mesh has a non-invertible global transform
    #[error("Mesh {mesh_index} is placed under a singular transform")]
    SingularMeshTransform { mesh_index: usize },

    /// Ticks per second is zero, negative or not finite
    #[error("Animation {animation_index} has unusable ticks per second ({ticks_per_second})")]
    ZeroTicksPerSecond {
        animation_index: usize,
        ticks_per_second: f64,
    },

    #[error("Invalid clip range: start {start} ticks, end {end} ticks")]
    InvalidClipRange { start: f64, end: f64 },

    #[error("Maximum bone matrices per mesh ({max_bone_matrices}) exceeds the stride ({stride})")]
    MaxBonesExceedsStride {
        max_bone_matrices: usize,
        stride: usize,
    },

    #[error("Mesh {mesh_index} has {bone_count} bones, but only {max_bone_matrices} bone matrices fit per mesh")]
    TooManyBones {
        mesh_index: usize,
        bone_count: usize,
        max_bone_matrices: usize,
    },

    #[error("Bone matrix storage too small: need {required} matrices, got {actual}")]
    StorageTooSmall { required: usize, actual: usize },

    /// Two bones of one mesh resolve to the same node
    #[error("Bones {first_bone} and {second_bone} of mesh {mesh_index} both resolve to node '{node}'")]
    DuplicateBoneTarget {
        mesh_index: usize,
        node: String,
        first_bone: usize,
        second_bone: usize,
    },

    #[error("Clip belongs to animation {clip_animation}, but the plan was built for animation {plan_animation}")]
    ClipAnimationMismatch {
        clip_animation: usize,
        plan_animation: usize,
    },

    /// Broken plan invariant
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;
