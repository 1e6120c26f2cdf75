//! Bone matrix storage layout

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AnimError, Result};

/// Where the bone matrices of each mesh slot live in caller storage
///
/// Mesh slot `i` owns `base + i * stride .. base + i * stride + max_bone_matrices`;
/// bone `j` of that mesh is written to `base + i * stride + j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneMatrixLayout {
    /// First slot used by mesh slot 0
    pub base: usize,
    /// Distance in matrices between consecutive mesh slots
    pub stride: usize,
    /// Matrices reserved per mesh slot, at most `stride`
    pub max_bone_matrices: usize,
}

impl BoneMatrixLayout {
    /// Layout with explicit base, stride and per-mesh capacity
    pub const fn new(base: usize, stride: usize, max_bone_matrices: usize) -> Self {
        Self {
            base,
            stride,
            max_bone_matrices,
        }
    }

    /// Layout where every mesh slot may use its whole stride
    pub const fn strided(base: usize, stride: usize) -> Self {
        Self::new(base, stride, stride)
    }

    /// Mesh slots packed back to back starting at 0
    pub const fn tightly_packed(max_bone_matrices: usize) -> Self {
        Self::new(0, max_bone_matrices, max_bone_matrices)
    }

    /// Override the matrices reserved per mesh slot
    pub const fn with_max_bone_matrices(mut self, max_bone_matrices: usize) -> Self {
        self.max_bone_matrices = max_bone_matrices;
        self
    }

    /// Check that mesh slots do not overlap
    pub fn validate(&self) -> Result<()> {
        if self.max_bone_matrices > self.stride {
            return Err(AnimError::MaxBonesExceedsStride {
                max_bone_matrices: self.max_bone_matrices,
                stride: self.stride,
            });
        }
        Ok(())
    }

    /// Minimum storage length for `mesh_count` mesh slots
    pub fn required_len(&self, mesh_count: usize) -> usize {
        match mesh_count {
            0 => self.base,
            n => self
                .base
                .saturating_add((n - 1).saturating_mul(self.stride))
                .saturating_add(self.max_bone_matrices),
        }
    }

    /// Storage slot of bone `bone_index` of mesh slot `mesh_slot`
    pub fn slot(&self, mesh_slot: usize, bone_index: usize) -> usize {
        self.base + mesh_slot * self.stride + bone_index
    }

    /// All storage slots owned by a mesh slot
    pub fn slot_range(&self, mesh_slot: usize) -> Range<usize> {
        let start = self.slot(mesh_slot, 0);
        start..start + self.max_bone_matrices
    }
}
