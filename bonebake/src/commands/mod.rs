//! Command implementations

pub mod anim;
pub mod scene;
