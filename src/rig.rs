//! Rig instance and transform output.
//!
//! [`RigAnimator`] owns the per-rig [`AnimatorState`] and skeleton, runs the
//! compositor once per tick and writes the result into a [`TransformSink`]:
//! one rotation write per bone and one translation write for the root.

use glam::{Affine3A, Quat, Vec3};

use crate::clock::AnimatorState;
use crate::compositor::{FrameInputs, compute_pose};
use crate::pose::{Pose, euler_to_quat, quat_to_euler};
use crate::skeleton::{Bone, Skeleton};

/// Per-bone transform writes consumed by the host scene graph.
pub trait TransformSink {
    fn write_rotation(&mut self, bone: Bone, rotation: Quat);

    /// Only ever called for [`Bone::ROOT`].
    fn write_translation(&mut self, bone: Bone, translation: Vec3);
}

/// Writes a sanitized pose into `sink`.
pub fn write_pose(pose: &Pose, skeleton: &Skeleton, sink: &mut impl TransformSink) {
    let pose = pose.sanitized();
    for bone in Bone::ALL {
        sink.write_rotation(bone, pose.rotation_quat(bone));
    }
    sink.write_translation(
        Bone::ROOT,
        skeleton.rest_offset(Bone::ROOT) + pose.root_translation(),
    );
}

// ============================================================================
// Reference sink
// ============================================================================

/// Local TRS of one bone with a cached matrix.
#[derive(Debug, Clone)]
pub struct BoneTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    local_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl BoneTransform {
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Affine3A::IDENTITY,
            last_position: position,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Recomputes the local matrix if any component changed.
    /// Returns whether it did.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);
            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        quat_to_euler(self.rotation)
    }

    pub fn set_rotation_euler(&mut self, euler: Vec3) {
        self.rotation = euler_to_quat(euler);
    }

    /// Forces the next matrix update even if nothing changed.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

/// Transform table for a whole rig, usable directly as a [`TransformSink`].
///
/// Bones start at their rest offsets; rotation writes replace the local
/// rotation, translation writes replace the root's local position.
#[derive(Debug, Clone)]
pub struct BoneTransforms {
    locals: [BoneTransform; Bone::COUNT],
    world: [Affine3A; Bone::COUNT],
}

impl BoneTransforms {
    #[must_use]
    pub fn new(skeleton: &Skeleton) -> Self {
        Self {
            locals: std::array::from_fn(|i| {
                let bone = Bone::ALL[i];
                let mut local = BoneTransform::new(skeleton.rest_offset(bone));
                local.set_rotation_euler(skeleton.rest_rotation(bone));
                local
            }),
            world: [Affine3A::IDENTITY; Bone::COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub fn local(&self, bone: Bone) -> &BoneTransform {
        &self.locals[bone.index()]
    }

    /// World (rig space) matrix as of the last [`update_world_matrices`](Self::update_world_matrices).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self, bone: Bone) -> &Affine3A {
        &self.world[bone.index()]
    }

    #[must_use]
    pub fn world_position(&self, bone: Bone) -> Vec3 {
        self.world[bone.index()].translation.into()
    }

    /// Propagates local matrices down the hierarchy. Returns how many local
    /// matrices changed.
    pub fn update_world_matrices(&mut self) -> usize {
        let mut changed = 0;
        for bone in Bone::ALL {
            let i = bone.index();
            if self.locals[i].update_local_matrix() {
                changed += 1;
            }
            let local = self.locals[i].local_matrix;
            // Bone::ALL is parents-first, so the parent's world is current.
            self.world[i] = match bone.parent() {
                Some(parent) => self.world[parent.index()] * local,
                None => local,
            };
        }
        changed
    }
}

impl TransformSink for BoneTransforms {
    fn write_rotation(&mut self, bone: Bone, rotation: Quat) {
        self.locals[bone.index()].rotation = rotation;
    }

    fn write_translation(&mut self, bone: Bone, translation: Vec3) {
        if !bone.is_root() {
            log::warn!("Ignoring translation write for non-root bone '{bone}'");
            return;
        }
        self.locals[bone.index()].position = translation;
    }
}

// ============================================================================
// Rig instance
// ============================================================================

/// One animated character: skeleton, runtime state and last output.
#[derive(Debug, Clone)]
pub struct RigAnimator {
    skeleton: Skeleton,
    state: AnimatorState,
    pose: Pose,
}

impl RigAnimator {
    #[must_use]
    pub fn new(skeleton: Skeleton) -> Self {
        let pose = skeleton.rest_pose();
        Self {
            skeleton,
            state: AnimatorState::new(),
            pose,
        }
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &AnimatorState {
        &self.state
    }

    /// Pause / freeze / rest-pose controls live here.
    #[inline]
    pub fn state_mut(&mut self) -> &mut AnimatorState {
        &mut self.state
    }

    /// Pose produced by the last [`update`](Self::update).
    #[inline]
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Advances the clock by `dt` seconds and recomputes the pose.
    pub fn update(&mut self, dt: f32, inputs: &FrameInputs<'_>) -> &Pose {
        self.state.clock.advance(dt);
        self.pose = compute_pose(&mut self.state, &self.skeleton, inputs);
        &self.pose
    }

    /// Writes the last pose into `sink`.
    pub fn apply(&self, sink: &mut impl TransformSink) {
        write_pose(&self.pose, &self.skeleton, sink);
    }
}
