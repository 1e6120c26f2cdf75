//! Key track tidy-up
//!
//! Tracks copied out of an animation channel are repaired so the evaluator
//! never has to special-case them: keys are sorted by time, rotations are
//! normalized, and every track ends up with at least two keys. Tracks with
//! a single key (or none, after defaults are applied) are widened to two
//! keys at [`SENTINEL_START`] and [`SENTINEL_END`] holding the same value,
//! which bracket every finite time.

use bonebake_scene::{QuatKey, VectorKey, normalize_or_identity};
use glam::{Quat, Vec3};
use log::{debug, warn};
use std::fmt;

/// Time of the leading key of a widened track
pub const SENTINEL_START: f64 = f64::MIN;
/// Time of the trailing key of a widened track
pub const SENTINEL_END: f64 = f64::MAX;

/// Common access to time-stamped keys
pub trait Keyframe: Copy {
    type Value: Copy;

    fn from_parts(time: f64, value: Self::Value) -> Self;
    fn time(&self) -> f64;
    fn value(&self) -> Self::Value;
}

impl Keyframe for VectorKey {
    type Value = Vec3;

    fn from_parts(time: f64, value: Vec3) -> Self {
        Self::new(time, value)
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn value(&self) -> Vec3 {
        self.value
    }
}

impl Keyframe for QuatKey {
    type Value = Quat;

    fn from_parts(time: f64, value: Quat) -> Self {
        Self::new(time, value)
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn value(&self) -> Quat {
        self.value
    }
}

/// Which of the three tracks of a channel is being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Position,
    Rotation,
    Scaling,
}

impl TrackKind {
    /// Neutral value of an empty vector track (rotation tracks default to identity)
    pub fn default_vector(self) -> Vec3 {
        match self {
            Self::Scaling => Vec3::ONE,
            Self::Position | Self::Rotation => Vec3::ZERO,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Rotation => write!(f, "rotation"),
            Self::Scaling => write!(f, "scaling"),
        }
    }
}

/// Copy and repair one key track
///
/// `node_name` and `kind` only feed the log messages.
pub fn tidy_track<K: Keyframe>(
    keys: &[K],
    default: K::Value,
    node_name: &str,
    kind: TrackKind,
) -> Vec<K> {
    let mut keys = keys.to_vec();

    if !is_sorted_by_time(&keys) {
        warn!(
            "{} keys of node '{}' are not sorted by time, sorting them",
            kind, node_name
        );
        // stable, so keys sharing a time keep their order
        keys.sort_by(|a, b| a.time().total_cmp(&b.time()));
    }

    match keys.as_slice() {
        [] => {
            debug!(
                "Node '{}' has no {} keys, using the default value",
                node_name, kind
            );
            widened(default)
        }
        [only] => widened(only.value()),
        _ => keys,
    }
}

/// Tidy a rotation track and normalize its quaternions
pub fn tidy_rotation_track(keys: &[QuatKey], node_name: &str) -> Vec<QuatKey> {
    let mut keys = tidy_track(keys, Quat::IDENTITY, node_name, TrackKind::Rotation);
    for key in &mut keys {
        key.value = normalize_or_identity(key.value);
    }
    keys
}

/// Two tracks share key times when they have the same length and equal times
pub fn same_key_times<A: Keyframe, B: Keyframe>(a: &[A], b: &[B]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(ka, kb)| ka.time() == kb.time())
}

fn widened<K: Keyframe>(value: K::Value) -> Vec<K> {
    vec![
        K::from_parts(SENTINEL_START, value),
        K::from_parts(SENTINEL_END, value),
    ]
}

fn is_sorted_by_time<K: Keyframe>(keys: &[K]) -> bool {
    keys.windows(2).all(|w| w[0].time() <= w[1].time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_track_gets_default() {
        let keys = tidy_track::<VectorKey>(&[], Vec3::ONE, "n", TrackKind::Scaling);
        assert_eq!(
            keys,
            vec![
                VectorKey::new(SENTINEL_START, Vec3::ONE),
                VectorKey::new(SENTINEL_END, Vec3::ONE),
            ]
        );
    }

    #[test]
    fn test_single_key_is_widened() {
        let keys = tidy_track(
            &[VectorKey::new(3.0, Vec3::X)],
            Vec3::ZERO,
            "n",
            TrackKind::Position,
        );
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].time, SENTINEL_START);
        assert_eq!(keys[1].time, SENTINEL_END);
        assert!(keys.iter().all(|k| k.value == Vec3::X));
    }

    #[test]
    fn test_unsorted_track_is_sorted_stably() {
        let keys = tidy_track(
            &[
                VectorKey::new(2.0, Vec3::Z),
                VectorKey::new(1.0, Vec3::X),
                VectorKey::new(1.0, Vec3::Y),
            ],
            Vec3::ZERO,
            "n",
            TrackKind::Position,
        );
        let values: Vec<Vec3> = keys.iter().map(|k| k.value).collect();
        assert_eq!(values, vec![Vec3::X, Vec3::Y, Vec3::Z]);
    }

    #[test]
    fn test_rotation_keys_are_normalized() {
        let keys = tidy_rotation_track(
            &[
                QuatKey::new(0.0, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0)),
                QuatKey::new(1.0, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)),
            ],
            "n",
        );
        assert_eq!(keys[0].value, Quat::IDENTITY);
        assert_eq!(keys[1].value, Quat::IDENTITY);
    }

    #[test]
    fn test_same_key_times() {
        let positions = [VectorKey::new(0.0, Vec3::ZERO), VectorKey::new(1.0, Vec3::ONE)];
        let rotations = [QuatKey::new(0.0, Quat::IDENTITY), QuatKey::new(1.0, Quat::IDENTITY)];
        let shifted = [QuatKey::new(0.0, Quat::IDENTITY), QuatKey::new(2.0, Quat::IDENTITY)];
        assert!(same_key_times(&positions, &rotations));
        assert!(!same_key_times(&positions, &shifted));
        assert!(!same_key_times(&positions, &rotations[..1]));
    }
}
