//! Poses and pose fragments.
//!
//! A [`Pose`] is the complete per-frame output: one Euler XYZ rotation
//! (radians) per bone plus a translation for the root. A [`PoseLayer`] is
//! a sparse fragment of a pose (editor overrides, a scrubbed clip, the
//! attack overlay) that only speaks for the bones it contains.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::sanitize::{self, finite_or_zero};
use crate::skeleton::{Bone, BoneMap};

/// Euler order used for every rotation in the crate.
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

/// Converts an Euler XYZ rotation into a quaternion.
#[inline]
#[must_use]
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EULER_ORDER, euler.x, euler.y, euler.z)
}

/// Converts a quaternion back into Euler XYZ angles.
#[inline]
#[must_use]
pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EULER_ORDER);
    Vec3::new(x, y, z)
}

/// Complete pose: every bone has a rotation, only the root translates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    rotations: [Vec3; Bone::COUNT],
    root_translation: Vec3,
}

impl Pose {
    /// All rotations zero, root at its rest offset.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            rotations: [Vec3::ZERO; Bone::COUNT],
            root_translation: Vec3::ZERO,
        }
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self, bone: Bone) -> Vec3 {
        self.rotations[bone.index()]
    }

    #[inline]
    pub fn set_rotation(&mut self, bone: Bone, rotation: Vec3) {
        self.rotations[bone.index()] = rotation;
    }

    /// Adds `delta` to the bone's Euler angles.
    #[inline]
    pub fn add_rotation(&mut self, bone: Bone, delta: Vec3) {
        self.rotations[bone.index()] += delta;
    }

    #[inline]
    #[must_use]
    pub fn rotation_quat(&self, bone: Bone) -> Quat {
        euler_to_quat(self.rotation(bone))
    }

    /// Translation of [`Bone::ROOT`] relative to its rest offset.
    #[inline]
    #[must_use]
    pub fn root_translation(&self) -> Vec3 {
        self.root_translation
    }

    #[inline]
    pub fn set_root_translation(&mut self, translation: Vec3) {
        self.root_translation = translation;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bone, Vec3)> + '_ {
        Bone::ALL.into_iter().map(|bone| (bone, self.rotation(bone)))
    }

    /// Copy with every non-finite component replaced by zero.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut pose = *self;
        for rotation in &mut pose.rotations {
            *rotation = finite_or_zero(*rotation);
        }
        pose.root_translation = finite_or_zero(pose.root_translation);
        pose
    }

    #[must_use]
    pub fn abs_diff_eq(&self, other: &Pose, max_abs_diff: f32) -> bool {
        self.root_translation
            .abs_diff_eq(other.root_translation, max_abs_diff)
            && self
                .rotations
                .iter()
                .zip(other.rotations.iter())
                .all(|(a, b)| a.abs_diff_eq(*b, max_abs_diff))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Sparse pose fragment.
///
/// Translations are keyed by bone for symmetry with authored data, but only
/// the root's entry is ever consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseLayer {
    #[serde(default, deserialize_with = "sanitize::bone_vectors")]
    pub rotations: BoneMap<Vec3>,
    #[serde(default, deserialize_with = "sanitize::bone_vectors")]
    pub translations: BoneMap<Vec3>,
}

impl PoseLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rotation(mut self, bone: Bone, rotation: Vec3) -> Self {
        self.rotations.insert(bone, rotation);
        self
    }

    #[must_use]
    pub fn with_root_translation(mut self, translation: Vec3) -> Self {
        self.translations.insert(Bone::ROOT, translation);
        self
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self, bone: Bone) -> Option<Vec3> {
        self.rotations.get(bone).copied()
    }

    #[inline]
    #[must_use]
    pub fn root_translation(&self) -> Option<Vec3> {
        self.translations.get(Bone::ROOT).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty() && self.translations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_round_trip() {
        let euler = Vec3::new(0.3, -0.2, 0.5);
        let back = quat_to_euler(euler_to_quat(euler));
        assert!(back.abs_diff_eq(euler, 1e-5), "{back}");
    }

    #[test]
    fn sanitized_pose_is_finite() {
        let mut pose = Pose::identity();
        pose.set_rotation(Bone::Head, Vec3::new(f32::NAN, 0.1, 0.0));
        pose.set_root_translation(Vec3::new(0.0, f32::INFINITY, 0.0));
        let clean = pose.sanitized();
        assert_eq!(clean.rotation(Bone::Head), Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(clean.root_translation(), Vec3::ZERO);
    }

    #[test]
    fn layer_parses_lenient_vectors() {
        let layer: PoseLayer = serde_json::from_str(
            r#"{ "rotations": { "head": [0.1, 0.2, 0.3], "chest": [1, 2] },
                 "translations": { "hips": { "x": 0, "y": 0.5, "z": 0 } } }"#,
        )
        .unwrap();
        assert_eq!(layer.rotation(Bone::Head), Some(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(layer.rotation(Bone::Chest), Some(Vec3::ZERO));
        assert_eq!(layer.root_translation(), Some(Vec3::new(0.0, 0.5, 0.0)));
    }
}
