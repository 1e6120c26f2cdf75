//! Per-frame plan evaluation

use glam::Mat4;
use log::trace;

use crate::clip::AnimationClip;
use crate::error::{AnimError, Result};
use crate::interpolation::{
    KeySpan, interpolate_position, interpolate_rotation, interpolate_scaling,
};
use crate::plan::{AnimatedNode, AnimationPlan, compose_local};

impl AnimatedNode {
    /// Local transform sampled from the key tracks
    fn sample(&self, time_in_ticks: f64) -> Mat4 {
        let position_span = KeySpan::locate(&self.position_keys, time_in_ticks);
        let rotation_span = if self.rotation_shares_position_times {
            position_span
        } else {
            KeySpan::locate(&self.rotation_keys, time_in_ticks)
        };
        let scaling_span = if self.scaling_shares_position_times {
            position_span
        } else {
            KeySpan::locate(&self.scaling_keys, time_in_ticks)
        };

        compose_local(
            interpolate_position(&self.position_keys, position_span),
            interpolate_rotation(&self.rotation_keys, rotation_span),
            interpolate_scaling(&self.scaling_keys, scaling_span),
        )
    }
}

impl AnimationPlan {
    /// Evaluate the plan at `time_in_ticks` and write every bone matrix
    ///
    /// Each bone slot receives `inverse_mesh_root * global * inverse_bind_pose`.
    /// Times outside the animation clamp to the first or last keys.
    pub fn evaluate(&mut self, time_in_ticks: f64, storage: &mut [Mat4]) -> Result<()> {
        let required = self.required_len();
        if storage.len() < required {
            return Err(AnimError::StorageTooSmall {
                required,
                actual: storage.len(),
            });
        }

        for record_index in 0..self.records.len() {
            let (evaluated, rest) = self.records.split_at_mut(record_index);
            let Some(record) = rest.first_mut() else {
                break;
            };

            let local = record.sample(time_in_ticks);
            let global = match record.animated_parent {
                Some(parent) => {
                    let parent = evaluated.get(parent).ok_or_else(|| {
                        AnimError::Internal(format!(
                            "animated parent {} of record {} is not evaluated yet",
                            parent, record_index
                        ))
                    })?;
                    parent.current_transform * record.static_parent_transform * local
                }
                None => record.static_parent_transform * local,
            };
            record.current_transform = global;

            for target in &record.bone_targets {
                if let Some(slot) = storage.get_mut(target.slot) {
                    *slot = target.inverse_mesh_root * global * target.inverse_bind_pose;
                }
            }
        }

        trace!(
            "Evaluated animation {} at {} ticks",
            self.animation_index, time_in_ticks
        );
        Ok(())
    }

    /// Evaluate at `seconds` using the clip's tick rate
    pub fn animate(
        &mut self,
        clip: &AnimationClip,
        seconds: f64,
        storage: &mut [Mat4],
    ) -> Result<()> {
        if clip.animation_index != self.animation_index {
            return Err(AnimError::ClipAnimationMismatch {
                clip_animation: clip.animation_index,
                plan_animation: self.animation_index,
            });
        }
        if !clip.ticks_per_second.is_finite() || clip.ticks_per_second <= 0.0 {
            return Err(AnimError::ZeroTicksPerSecond {
                animation_index: clip.animation_index,
                ticks_per_second: clip.ticks_per_second,
            });
        }

        self.evaluate(clip.ticks_at(seconds), storage)
    }
}

/// Evaluate independent plans concurrently, each into its own storage
///
/// Fails with one of the errors if any plan fails.
#[cfg(feature = "parallel")]
pub fn evaluate_parallel(
    jobs: &mut [(&mut AnimationPlan, &mut [Mat4])],
    time_in_ticks: f64,
) -> Result<()> {
    use rayon::prelude::*;

    jobs.par_iter_mut()
        .try_for_each(|(plan, storage)| plan.evaluate(time_in_ticks, storage))
}
