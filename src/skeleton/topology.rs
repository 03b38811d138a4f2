use glam::Vec3;

use crate::errors::Result;
use crate::pose::Pose;
use crate::skeleton::Bone;

/// Static description of the rig: names, hierarchy and rest pose.
///
/// The hierarchy itself is fixed by [`Bone::parent`]; a `Skeleton` only
/// carries the per-bone rest data, so two rigs of different proportions
/// share the same topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub name: String,

    // Local offset of each joint from its parent, in the parent's space.
    // For the root this is the offset from the rig origin.
    rest_offsets: [Vec3; Bone::COUNT],

    // Euler XYZ rest rotation, used by the "force rest pose" display.
    rest_rotations: [Vec3; Bone::COUNT],
}

impl Skeleton {
    /// Creates a skeleton with all-zero offsets and identity rest rotations.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rest_offsets: [Vec3::ZERO; Bone::COUNT],
            rest_rotations: [Vec3::ZERO; Bone::COUNT],
        }
    }

    /// Default humanoid proportions, roughly 1.8 units tall, facing +Z.
    ///
    /// Left limbs sit on +X. Every rest rotation is identity (T-pose).
    #[must_use]
    pub fn humanoid() -> Self {
        let mut skeleton = Self::new("humanoid");
        let offsets = [
            (Bone::Hips, Vec3::new(0.0, 1.0, 0.0)),
            (Bone::Chest, Vec3::new(0.0, 0.25, 0.0)),
            (Bone::Head, Vec3::new(0.0, 0.32, 0.0)),
            (Bone::LeftArm, Vec3::new(0.18, 0.22, 0.0)),
            (Bone::LeftForearm, Vec3::new(0.28, 0.0, 0.0)),
            (Bone::LeftHand, Vec3::new(0.25, 0.0, 0.0)),
            (Bone::RightArm, Vec3::new(-0.18, 0.22, 0.0)),
            (Bone::RightForearm, Vec3::new(-0.28, 0.0, 0.0)),
            (Bone::RightHand, Vec3::new(-0.25, 0.0, 0.0)),
            (Bone::LeftThigh, Vec3::new(0.1, -0.05, 0.0)),
            (Bone::LeftCalf, Vec3::new(0.0, -0.45, 0.0)),
            (Bone::LeftFoot, Vec3::new(0.0, -0.43, 0.0)),
            (Bone::RightThigh, Vec3::new(-0.1, -0.05, 0.0)),
            (Bone::RightCalf, Vec3::new(0.0, -0.45, 0.0)),
            (Bone::RightFoot, Vec3::new(0.0, -0.43, 0.0)),
        ];
        for (bone, offset) in offsets {
            skeleton.rest_offsets[bone.index()] = offset;
        }
        skeleton
    }

    #[must_use]
    pub fn with_rest_offset(mut self, bone: Bone, offset: Vec3) -> Self {
        self.rest_offsets[bone.index()] = offset;
        self
    }

    #[must_use]
    pub fn with_rest_rotation(mut self, bone: Bone, rotation: Vec3) -> Self {
        self.rest_rotations[bone.index()] = rotation;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, bone: Bone) -> Option<Bone> {
        bone.parent()
    }

    pub fn children(&self, bone: Bone) -> impl Iterator<Item = Bone> {
        Bone::ALL
            .into_iter()
            .filter(move |child| child.parent() == Some(bone))
    }

    #[inline]
    #[must_use]
    pub fn rest_offset(&self, bone: Bone) -> Vec3 {
        self.rest_offsets[bone.index()]
    }

    #[inline]
    #[must_use]
    pub fn rest_rotation(&self, bone: Bone) -> Vec3 {
        self.rest_rotations[bone.index()]
    }

    /// Every bone at its rest rotation, root untranslated.
    #[must_use]
    pub fn rest_pose(&self) -> Pose {
        let mut pose = Pose::identity();
        for bone in Bone::ALL {
            pose.set_rotation(bone, self.rest_rotation(bone));
        }
        pose
    }

    /// Resolves an external bone identifier against the topology.
    pub fn bone(&self, name: &str) -> Result<Bone> {
        name.parse()
    }

    /// Sum of rest offsets from the root down to `bone`.
    #[must_use]
    pub fn rest_model_position(&self, bone: Bone) -> Vec3 {
        let mut position = self.rest_offset(bone);
        let mut current = bone.parent();
        while let Some(parent) = current {
            position += self.rest_offset(parent);
            current = parent.parent();
        }
        position
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::humanoid()
    }
}
