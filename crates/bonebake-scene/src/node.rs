//! Flat node arena entries

use glam::Mat4;
use std::fmt;

/// Index of a node inside the scene's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always stored first
    pub const ROOT: Self = Self(0);

    /// Position in the arena
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the imported hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Mat4,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Indices of meshes placed at this node
    pub meshes: Vec<usize>,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
