//! Skeletal animation planning and evaluation
//!
//! This crate turns one animation of a [`bonebake_scene::Scene`] into an
//! [`AnimationPlan`]: an ordered, time-independent list of animated node
//! records. Evaluating the plan at a time interpolates every record's key
//! tracks, propagates transforms down the hierarchy and writes one matrix
//! per skin bone into caller-owned storage:
//!
//! ```text
//! storage[slot] = inverse_mesh_root * global(t) * inverse_bind_pose
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bonebake_anim::{AnimationClip, AnimationPlan, BoneMatrixLayout};
//! use bonebake_scene::Scene;
//! use glam::Mat4;
//!
//! let scene = Scene::load("character.json")?;
//! let meshes = scene.select_all_meshes();
//! let layout = BoneMatrixLayout::tightly_packed(64);
//! let mut bones = vec![Mat4::IDENTITY; layout.required_len(meshes.len())];
//!
//! let mut plan = AnimationPlan::build(&scene, 0, &meshes, layout, &mut bones)?;
//! let clip = AnimationClip::full(&scene, 0)?;
//! plan.evaluate(clip.looped_ticks(1.25), &mut bones)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod clip;
pub mod error;
mod evaluate;
pub mod interpolation;
pub mod keys;
pub mod layout;
pub mod plan;

pub use classifier::{BoneBinding, ChannelMap, classify_channels, resolve_mesh_bones};
pub use clip::AnimationClip;
pub use error::{AnimError, Result};
#[cfg(feature = "parallel")]
pub use evaluate::evaluate_parallel;
pub use layout::BoneMatrixLayout;
pub use plan::{AnimatedNode, AnimationPlan, BoneTarget, MeshTarget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
