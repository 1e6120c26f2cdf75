//! Animation clips: a tick range of one animation plus its tick rate

use bonebake_scene::Scene;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AnimError, Result};

/// Playback range of one animation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationClip {
    pub animation_index: usize,
    pub ticks_per_second: f64,
    pub start_ticks: f64,
    pub end_ticks: f64,
}

impl AnimationClip {
    /// Describe the range `start_ticks..end_ticks` of an animation
    ///
    /// The end is clamped to the animation's duration.
    pub fn load(
        scene: &Scene,
        animation_index: usize,
        start_ticks: f64,
        end_ticks: f64,
    ) -> Result<Self> {
        if !scene.has_animations() {
            return Err(AnimError::NoAnimations);
        }
        let animation =
            scene
                .animation(animation_index)
                .ok_or(AnimError::AnimationIndexOutOfRange {
                    index: animation_index,
                    count: scene.animation_count(),
                })?;

        let ticks_per_second = animation.ticks_per_second;
        if !ticks_per_second.is_finite() || ticks_per_second <= 0.0 {
            return Err(AnimError::ZeroTicksPerSecond {
                animation_index,
                ticks_per_second,
            });
        }

        let clamped_end = end_ticks.min(animation.duration);
        let start_invalid = start_ticks.is_nan() || start_ticks < 0.0;
        if start_invalid || clamped_end.is_nan() || clamped_end <= start_ticks {
            return Err(AnimError::InvalidClipRange {
                start: start_ticks,
                end: clamped_end,
            });
        }

        Ok(Self {
            animation_index,
            ticks_per_second,
            start_ticks,
            end_ticks: clamped_end,
        })
    }

    /// The whole animation
    pub fn full(scene: &Scene, animation_index: usize) -> Result<Self> {
        let duration = scene
            .animation(animation_index)
            .map_or(0.0, |a| a.duration);
        Self::load(scene, animation_index, 0.0, duration)
    }

    pub fn duration_ticks(&self) -> f64 {
        self.end_ticks - self.start_ticks
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_ticks() / self.ticks_per_second
    }

    /// Convert seconds to ticks
    pub fn ticks_at(&self, seconds: f64) -> f64 {
        seconds * self.ticks_per_second
    }

    /// Ticks reached `seconds` after the clip start, held at the clip end
    pub fn clamped_ticks(&self, seconds: f64) -> f64 {
        (self.start_ticks + self.ticks_at(seconds)).clamp(self.start_ticks, self.end_ticks)
    }

    /// Ticks reached `seconds` after the clip start, wrapping inside the clip
    pub fn looped_ticks(&self, seconds: f64) -> f64 {
        let duration = self.duration_ticks();
        if !duration.is_finite() || duration <= 0.0 {
            return self.start_ticks;
        }
        self.start_ticks + self.ticks_at(seconds).rem_euclid(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonebake_scene::{Animation, NodeDescription, SceneDescription};
    use test_case::test_case;

    fn scene_with(duration: f64, ticks_per_second: f64) -> Scene {
        Scene::from_description(SceneDescription {
            root: NodeDescription::new("root"),
            meshes: Vec::new(),
            animations: vec![Animation {
                name: "clip".to_string(),
                duration,
                ticks_per_second,
                channels: Vec::new(),
            }],
        })
        .unwrap()
    }

    #[test]
    fn test_end_clamped_to_duration() {
        let clip = AnimationClip::load(&scene_with(40.0, 20.0), 0, 10.0, 100.0).unwrap();
        assert_eq!(clip.end_ticks, 40.0);
        assert_eq!(clip.duration_ticks(), 30.0);
        assert_eq!(clip.duration_seconds(), 1.5);
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-24.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    fn test_unusable_ticks_per_second(ticks_per_second: f64) {
        let scene = scene_with(40.0, ticks_per_second);
        let err = AnimationClip::load(&scene, 0, 0.0, 40.0).unwrap_err();
        assert!(matches!(
            err,
            AnimError::ZeroTicksPerSecond {
                animation_index: 0,
                ..
            }
        ));
    }

    #[test_case(-1.0, 10.0 ; "negative start")]
    #[test_case(10.0, 10.0 ; "empty range")]
    #[test_case(10.0, 5.0 ; "reversed range")]
    #[test_case(50.0, 60.0 ; "start past duration")]
    fn test_invalid_range(start: f64, end: f64) {
        let err = AnimationClip::load(&scene_with(40.0, 20.0), 0, start, end).unwrap_err();
        assert!(matches!(err, AnimError::InvalidClipRange { .. }));
    }

    #[test]
    fn test_missing_animations() {
        let empty = Scene::from_description(SceneDescription::default()).unwrap();
        assert!(matches!(
            AnimationClip::load(&empty, 0, 0.0, 1.0),
            Err(AnimError::NoAnimations)
        ));
        assert!(matches!(
            AnimationClip::load(&scene_with(1.0, 1.0), 3, 0.0, 1.0),
            Err(AnimError::AnimationIndexOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn test_clamped_and_looped_ticks() {
        let clip = AnimationClip::load(&scene_with(40.0, 10.0), 0, 10.0, 30.0).unwrap();
        assert_eq!(clip.ticks_at(0.5), 5.0);
        assert_eq!(clip.clamped_ticks(0.5), 15.0);
        assert_eq!(clip.clamped_ticks(10.0), 30.0);
        assert_eq!(clip.clamped_ticks(-1.0), 10.0);
        assert_eq!(clip.looped_ticks(0.5), 15.0);
        assert_eq!(clip.looped_ticks(2.5), 15.0);
        assert_eq!(clip.looped_ticks(-0.5), 25.0);
    }

    #[test]
    fn test_full_clip() {
        let clip = AnimationClip::full(&scene_with(40.0, 10.0), 0).unwrap();
        assert_eq!((clip.start_ticks, clip.end_ticks), (0.0, 40.0));
    }
}
