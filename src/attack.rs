//! Attack Overlay
//!
//! Windup → strike → recovery overlay blended over the base locomotion
//! pose. The overlay runs on its own local timeline, started by
//! [`AttackTrigger`](crate::clock::AttackTrigger), so repeated attacks can
//! re-trigger mid-recovery without touching the locomotion clock.

use glam::Vec3;

use crate::animation::values::{ChannelKind, ease_in_out, lerp_euler};
use crate::animation::{ActionClip, ActionLibrary};
use crate::locomotion::AttackConfig;
use crate::pose::{Pose, PoseLayer};
use crate::skeleton::Bone;

// Procedural swing targets at intensity 1, Euler XYZ.
const COCKED_ARM: Vec3 = Vec3::new(-1.9, 0.3, -0.4);
const FOLLOW_THROUGH_ARM: Vec3 = Vec3::new(0.9, -0.5, 0.2);
const COCKED_FOREARM: Vec3 = Vec3::new(-1.2, 0.0, 0.0);
const FOLLOW_THROUGH_FOREARM: Vec3 = Vec3::new(-0.2, 0.0, 0.0);
const COCKED_CHEST: Vec3 = Vec3::new(0.0, 0.45, 0.0);
const FOLLOW_THROUGH_CHEST: Vec3 = Vec3::new(0.1, -0.5, 0.0);
// Head keeps looking at the target while the chest twists.
const HEAD_COUNTER: f32 = -0.5;

/// Which arm swings.
pub const MAIN_HAND_ARM: Bone = Bone::RightArm;
const MAIN_HAND_FOREARM: Bone = Bone::RightForearm;

/// Where a running attack is on its local timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackPhase {
    Dormant,
    /// `progress` in [0, windup_ratio)
    Windup { progress: f32 },
    /// `progress` in [windup_ratio, 1]
    Strike { progress: f32 },
    /// `recovery_progress` in [0, 1)
    Recovery { recovery_progress: f32 },
}

impl AttackPhase {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, AttackPhase::Dormant)
    }

    /// Overlay weight against the base pose: 1 until the strike ends, then
    /// `1 − recovery_progress`.
    #[must_use]
    pub fn influence(&self) -> f32 {
        match *self {
            AttackPhase::Dormant => 0.0,
            AttackPhase::Windup { .. } | AttackPhase::Strike { .. } => 1.0,
            AttackPhase::Recovery { recovery_progress } => 1.0 - recovery_progress,
        }
    }
}

/// Durations derived from an [`AttackConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTiming {
    pub duration: f32,
    pub recovery_time: f32,
    pub windup_ratio: f32,
}

impl AttackTiming {
    #[must_use]
    pub fn from_config(config: &AttackConfig) -> Self {
        Self {
            duration: config.duration(),
            recovery_time: config.recovery_time(),
            windup_ratio: config.windup_ratio,
        }
    }

    /// Strike progress in [0, 1].
    #[must_use]
    pub fn progress(&self, time_since: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (time_since / self.duration).clamp(0.0, 1.0)
    }

    /// Recovery progress in [0, 1]; zero until the strike ends.
    #[must_use]
    pub fn recovery_progress(&self, time_since: f32) -> f32 {
        if time_since <= self.duration {
            return 0.0;
        }
        if self.recovery_time <= 0.0 {
            return 1.0;
        }
        ((time_since - self.duration) / self.recovery_time).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn phase(&self, time_since: f32) -> AttackPhase {
        let time_since = time_since.max(0.0);
        if time_since <= self.duration {
            let progress = self.progress(time_since);
            if progress < self.windup_ratio {
                AttackPhase::Windup { progress }
            } else {
                AttackPhase::Strike { progress }
            }
        } else {
            let recovery_progress = self.recovery_progress(time_since);
            if recovery_progress >= 1.0 {
                AttackPhase::Dormant
            } else {
                AttackPhase::Recovery { recovery_progress }
            }
        }
    }
}

/// Builds the overlay fragment for one frame.
#[derive(Debug, Clone, Copy)]
pub struct AttackOverlay<'a> {
    config: &'a AttackConfig,
    library: &'a ActionLibrary,
}

impl<'a> AttackOverlay<'a> {
    #[must_use]
    pub fn new(config: &'a AttackConfig, library: &'a ActionLibrary) -> Self {
        Self { config, library }
    }

    #[must_use]
    pub fn timing(&self) -> AttackTiming {
        AttackTiming::from_config(self.config)
    }

    /// Bones the overlay may touch. While moving, locomotion keeps the legs
    /// and root.
    #[must_use]
    pub fn owns(bone: Bone, moving: bool) -> bool {
        !moving || bone.is_upper_body()
    }

    /// Overlay for `phase`, blended against `base`. `None` when dormant.
    #[must_use]
    pub fn layer(&self, phase: AttackPhase, base: &Pose, moving: bool) -> Option<PoseLayer> {
        if !phase.is_active() {
            return None;
        }
        let layer = match self.library.resolve(self.config.linked_action.as_deref()) {
            Some(clip) => linked_layer(clip, phase, moving),
            None => self.procedural_layer(phase, base, moving),
        };
        Some(blend_toward_base(layer, base, phase.influence()))
    }

    fn procedural_layer(&self, phase: AttackPhase, base: &Pose, moving: bool) -> PoseLayer {
        let intensity = self.config.intensity;
        let windup = self.config.windup_ratio;

        // Recovery starts from the end of the strike.
        let progress = match phase {
            AttackPhase::Windup { progress } | AttackPhase::Strike { progress } => progress,
            AttackPhase::Recovery { .. } | AttackPhase::Dormant => 1.0,
        };

        let cocked_arm = COCKED_ARM * intensity;
        let cocked_forearm = COCKED_FOREARM * intensity;
        let cocked_chest = COCKED_CHEST * intensity;

        if progress < windup {
            // Wind up out of whatever the rig was doing on the trigger frame.
            let cocked = self.swing_layer(cocked_arm, cocked_forearm, cocked_chest, 0.0, moving);
            return blend_toward_base(cocked, base, ease_in_out(progress / windup));
        }

        let span = (1.0 - windup).max(f32::EPSILON);
        let e = ease_in_out(((progress - windup) / span).clamp(0.0, 1.0));
        self.swing_layer(
            cocked_arm.lerp(FOLLOW_THROUGH_ARM * intensity, e),
            cocked_forearm.lerp(FOLLOW_THROUGH_FOREARM * intensity, e),
            cocked_chest.lerp(FOLLOW_THROUGH_CHEST * intensity, e),
            e,
            moving,
        )
    }

    /// Upper-body swing plus, when standing, a fully set lunge.
    fn swing_layer(&self, arm: Vec3, forearm: Vec3, chest: Vec3, strike: f32, moving: bool) -> PoseLayer {
        let mut layer = PoseLayer::new()
            .with_rotation(MAIN_HAND_ARM, arm)
            .with_rotation(MAIN_HAND_FOREARM, forearm)
            .with_rotation(Bone::Chest, chest)
            .with_rotation(Bone::Head, Vec3::new(0.0, chest.y * HEAD_COUNTER, 0.0));

        if !moving {
            // Lunge: front (left) leg forward, rear leg back, knees bent.
            let spread = self.config.leg_spread;
            let crouch = self.config.crouch;
            layer = layer
                .with_rotation(Bone::LeftThigh, Vec3::new(-spread, 0.0, 0.0))
                .with_rotation(Bone::RightThigh, Vec3::new(spread, 0.0, 0.0))
                .with_rotation(Bone::LeftCalf, Vec3::new(2.0 * crouch, 0.0, 0.0))
                .with_rotation(Bone::RightCalf, Vec3::new(2.0 * crouch, 0.0, 0.0))
                .with_root_translation(Vec3::new(0.0, -crouch, -self.config.recoil * strike));
        }
        layer
    }
}

/// Samples a linked attack clip at the strike progress for every bone the
/// overlay owns. Bones the clip does not key are left to locomotion.
fn linked_layer(clip: &ActionClip, phase: AttackPhase, moving: bool) -> PoseLayer {
    let progress = match phase {
        AttackPhase::Windup { progress } | AttackPhase::Strike { progress } => progress,
        AttackPhase::Recovery { .. } | AttackPhase::Dormant => 1.0,
    };
    let mut layer = PoseLayer::new();
    for bone in Bone::ALL {
        if !AttackOverlay::owns(bone, moving) {
            continue;
        }
        if let Some(rotation) = clip.sample(progress, bone, ChannelKind::Rotation) {
            layer.rotations.insert(bone, rotation);
        }
    }
    if AttackOverlay::owns(Bone::ROOT, moving)
        && let Some(translation) = clip.sample(progress, Bone::ROOT, ChannelKind::Translation)
    {
        layer.translations.insert(Bone::ROOT, translation);
    }
    layer
}

/// Blends every entry of `layer` from the base pose toward the layer value.
/// With `influence` 1 the layer replaces the base outright.
fn blend_toward_base(mut layer: PoseLayer, base: &Pose, influence: f32) -> PoseLayer {
    if influence >= 1.0 {
        return layer;
    }
    for bone in Bone::ALL {
        if let Some(rotation) = layer.rotations.get_mut(bone) {
            *rotation = lerp_euler(base.rotation(bone), *rotation, influence);
        }
    }
    if let Some(translation) = layer.translations.get_mut(Bone::ROOT) {
        *translation = base.root_translation().lerp(*translation, influence);
    }
    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_follow_the_timeline() {
        let timing = AttackTiming {
            duration: 0.6,
            recovery_time: 1.2,
            windup_ratio: 0.3,
        };
        assert!(matches!(timing.phase(0.1), AttackPhase::Windup { .. }));
        assert!(matches!(timing.phase(0.3), AttackPhase::Strike { .. }));
        assert!(matches!(timing.phase(1.0), AttackPhase::Recovery { .. }));
        assert_eq!(timing.phase(2.0), AttackPhase::Dormant);
    }

    #[test]
    fn zero_windup_goes_straight_to_strike() {
        let timing = AttackTiming {
            duration: 0.6,
            recovery_time: 0.6,
            windup_ratio: 0.0,
        };
        assert!(matches!(timing.phase(0.0), AttackPhase::Strike { .. }));
    }
}
