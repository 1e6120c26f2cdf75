//! Animation clips, per-node channels and key tracks

use glam::{Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Unit quaternion, `None` for zero-length or non-finite input
pub fn try_normalize_rotation(q: Quat) -> Option<Quat> {
    Vec4::from(q).try_normalize().map(Quat::from_vec4)
}

/// Unit quaternion, or identity for degenerate input
pub fn normalize_or_identity(q: Quat) -> Quat {
    try_normalize_rotation(q).unwrap_or(Quat::IDENTITY)
}

/// Time-stamped 3D vector key, used for positions and scalings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorKey {
    /// Key time in ticks
    pub time: f64,
    pub value: Vec3,
}

impl VectorKey {
    pub const fn new(time: f64, value: Vec3) -> Self {
        Self { time, value }
    }
}

/// Time-stamped rotation key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatKey {
    /// Key time in ticks
    pub time: f64,
    pub value: Quat,
}

impl QuatKey {
    pub const fn new(time: f64, value: Quat) -> Self {
        Self { time, value }
    }
}

/// Key tracks driving a single node
///
/// The three tracks are sized and timed independently of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Name of the node this channel animates
    #[serde(rename = "node")]
    pub node_name: String,
    #[serde(default)]
    pub position_keys: Vec<VectorKey>,
    #[serde(default)]
    pub rotation_keys: Vec<QuatKey>,
    #[serde(default)]
    pub scaling_keys: Vec<VectorKey>,
}

impl Channel {
    /// Create a channel without keys
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Default::default()
        }
    }

    /// Total number of keys over all three tracks
    pub fn key_count(&self) -> usize {
        self.position_keys.len() + self.rotation_keys.len() + self.scaling_keys.len()
    }
}

/// An animation as delivered by the importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default)]
    pub name: String,
    /// Duration in ticks
    pub duration: f64,
    /// Ticks per second; importers report 0 when the source file is silent
    #[serde(default)]
    pub ticks_per_second: f64,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Animation {
    /// Duration in seconds, `None` when the tick rate is unusable
    pub fn duration_seconds(&self) -> Option<f64> {
        if self.ticks_per_second.is_finite() && self.ticks_per_second > 0.0 {
            Some(self.duration / self.ticks_per_second)
        } else {
            None
        }
    }

    /// Find the channel driving the given node name
    pub fn channel_for(&self, node_name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.node_name == node_name)
    }
}
