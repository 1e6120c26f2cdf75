//! Keyframe interpolation for tidied key tracks
//!
//! All functions expect tracks that went through [`crate::keys::tidy_track`],
//! so every track holds at least two keys sorted by time.

use bonebake_scene::{QuatKey, VectorKey, normalize_or_identity};
use glam::{Quat, Vec3};

use crate::keys::Keyframe;

/// Find the earlier key of the pair bracketing `time`
///
/// Returns `i` such that `keys[i].time <= time <= keys[i + 1].time`. Times
/// before the first key clamp to the first pair, times after the last key
/// clamp to the last pair. Tracks with fewer than two keys yield 0.
pub fn find_key_pair<K: Keyframe>(keys: &[K], time: f64) -> usize {
    if keys.len() < 2 {
        return 0;
    }

    // number of keys at or before `time`
    let upper = keys.partition_point(|k| k.time() <= time);
    upper.saturating_sub(1).min(keys.len() - 2)
}

/// Position of `time` between `start` and `end`, clamped to `[0, 1]`
///
/// A span that is not finite or not positive yields 0, which keeps the
/// sentinel pairs of widened tracks (and duplicate key times) well defined.
pub fn interpolation_factor(start: f64, end: f64, time: f64) -> f32 {
    let span = end - start;
    if !span.is_finite() || span <= 0.0 {
        return 0.0;
    }

    let factor = (time - start) / span;
    if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0) as f32
    }
}

/// Bracket and factor for one track at one time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeySpan {
    pub index: usize,
    pub factor: f32,
}

impl KeySpan {
    pub fn locate<K: Keyframe>(keys: &[K], time: f64) -> Self {
        let index = find_key_pair(keys, time);
        let factor = match (keys.get(index), keys.get(index + 1)) {
            (Some(a), Some(b)) => interpolation_factor(a.time(), b.time(), time),
            _ => 0.0,
        };
        Self { index, factor }
    }
}

fn vector_at(keys: &[VectorKey], span: KeySpan, default: Vec3) -> Vec3 {
    match (keys.get(span.index), keys.get(span.index + 1)) {
        (Some(a), Some(b)) => a.value.lerp(b.value, span.factor),
        (Some(a), None) => a.value,
        _ => default,
    }
}

/// Linear interpolation of a position track
pub fn interpolate_position(keys: &[VectorKey], span: KeySpan) -> Vec3 {
    vector_at(keys, span, Vec3::ZERO)
}

/// Linear interpolation of a scaling track
pub fn interpolate_scaling(keys: &[VectorKey], span: KeySpan) -> Vec3 {
    vector_at(keys, span, Vec3::ONE)
}

/// Normalized spherical interpolation of a rotation track along the shortest arc
pub fn interpolate_rotation(keys: &[QuatKey], span: KeySpan) -> Quat {
    match (keys.get(span.index), keys.get(span.index + 1)) {
        (Some(a), Some(b)) => {
            let end = if a.value.dot(b.value) < 0.0 {
                -b.value
            } else {
                b.value
            };
            normalize_or_identity(a.value.slerp(end, span.factor))
        }
        (Some(a), None) => a.value,
        _ => Quat::IDENTITY,
    }
}
