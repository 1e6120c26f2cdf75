//! Common scene fixtures for animation tests

#![allow(dead_code)]

use bonebake_scene::{
    Animation, Bone, Channel, Mesh, NodeDescription, NodeId, QuatKey, Scene, SceneDescription,
    SceneIndex, VectorKey,
};
use glam::{Mat4, Quat, Vec3};

pub const EPSILON: f32 = 1e-5;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_mat4_eq(actual: Mat4, expected: Mat4) {
    assert!(
        actual.abs_diff_eq(expected, EPSILON),
        "matrices differ\n  actual: {actual}\nexpected: {expected}"
    );
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

pub fn node(name: &str) -> NodeDescription {
    NodeDescription::new(name)
}

pub fn mesh(name: &str, bones: &[(&str, Mat4)]) -> Mesh {
    Mesh {
        name: name.to_string(),
        vertex_count: 0,
        bones: bones
            .iter()
            .map(|(bone, offset)| Bone::new(*bone, *offset))
            .collect(),
    }
}

/// Animation of 10 ticks at 10 ticks per second
pub fn animation(channels: Vec<Channel>) -> Animation {
    Animation {
        name: "test".to_string(),
        duration: 10.0,
        ticks_per_second: 10.0,
        channels,
    }
}

pub fn position_channel(node_name: &str, keys: &[(f64, Vec3)]) -> Channel {
    let mut channel = Channel::new(node_name);
    channel.position_keys = keys.iter().map(|&(t, v)| VectorKey::new(t, v)).collect();
    channel
}

pub fn rotation_channel(node_name: &str, keys: &[(f64, Quat)]) -> Channel {
    let mut channel = Channel::new(node_name);
    channel.rotation_keys = keys.iter().map(|&(t, v)| QuatKey::new(t, v)).collect();
    channel
}

pub fn scene(root: NodeDescription, meshes: Vec<Mesh>, animations: Vec<Animation>) -> Scene {
    Scene::from_description(SceneDescription {
        root,
        meshes,
        animations,
    })
    .unwrap()
}

pub fn node_id(scene: &Scene, name: &str) -> NodeId {
    SceneIndex::build(scene)
        .get(name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}
