use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use crate::animation::{ActionClip, ActionLibrary};
use crate::locomotion::config::{LocomotionConfig, LocomotionConfigs, LocomotionState};
use crate::pose::Pose;
use crate::skeleton::Bone;

// Chest yaw per radian of movement-intent angle.
const TORSO_COUNTER_YAW: f32 = 0.35;
// Chest pitch while moving backwards.
const BACKWARD_LEAN: f32 = -0.12;
// Forearm bend as a fraction of the arm swing.
const FOREARM_FOLLOW: f32 = 0.5;
// Foot pitch compensating part of the knee bend.
const FOOT_COMPENSATION: f32 = 0.5;
// Pelvis yaw per radian of leg swing.
const HIP_TWIST: f32 = 0.2;
// Share of the torso rotation the head cancels to keep the gaze level.
const HEAD_STABILIZATION: f32 = 0.8;
// Intent vectors shorter than this carry no direction.
const MIN_INTENT: f32 = 1e-4;

/// Per-frame inputs of the locomotion generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionInput {
    pub state: LocomotionState,
    /// Accumulated clock time in seconds.
    pub time: f32,
    /// Movement intent: `x` lateral, `y` forward.
    pub intent: Vec2,
    pub moving: bool,
}

/// Produces the base pose for idle, walk and run.
///
/// Either synthesizes the cycle procedurally or, when the state's config
/// links a loaded clip, re-times that clip and layers the procedural gains
/// on top of it.
#[derive(Debug, Clone, Copy)]
pub struct Locomotion<'a> {
    configs: &'a LocomotionConfigs,
    library: &'a ActionLibrary,
}

impl<'a> Locomotion<'a> {
    #[must_use]
    pub fn new(configs: &'a LocomotionConfigs, library: &'a ActionLibrary) -> Self {
        Self { configs, library }
    }

    /// The state whose gait drives the base pose. An attacking character
    /// keeps walking if it is moving and stands idle otherwise.
    #[must_use]
    pub fn effective_state(input: &LocomotionInput) -> LocomotionState {
        match input.state {
            LocomotionState::Attack if input.moving => LocomotionState::Walk,
            LocomotionState::Attack => LocomotionState::Idle,
            state => state,
        }
    }

    #[must_use]
    pub fn pose(&self, input: &LocomotionInput) -> Pose {
        let state = Self::effective_state(input);
        let config = self.configs.for_state(state);

        if let Some(clip) = self.library.resolve(config.linked_action.as_deref()) {
            return self.linked_pose(clip, state, config, input);
        }

        if state == LocomotionState::Idle || config.speed == 0.0 {
            let mut pose = Pose::identity();
            apply_idle_layer(&mut pose, &self.configs.idle, input.time);
            return pose;
        }

        gait_pose(state, config, input)
    }

    /// Clip-driven base pose ("hybrid" mode).
    fn linked_pose(
        &self,
        clip: &ActionClip,
        state: LocomotionState,
        config: &LocomotionConfig,
        input: &LocomotionInput,
    ) -> Pose {
        let rate = playback_rate(config.speed, state);
        let t = clip.normalized_time_at(input.time, rate);
        let layer = clip.sample_pose(t, false);

        let mut pose = Pose::identity();
        for (bone, rotation) in layer.rotations.iter() {
            pose.set_rotation(bone, *rotation);
        }
        if let Some(translation) = layer.root_translation() {
            pose.set_root_translation(translation);
        }

        if state == LocomotionState::Idle {
            apply_idle_layer(&mut pose, config, input.time);
        } else {
            for bone in Bone::ALL {
                if bone.is_leg() {
                    pose.set_rotation(bone, pose.rotation(bone) * config.leg_amplitude);
                } else if bone.is_arm() {
                    pose.set_rotation(bone, pose.rotation(bone) * config.arm_amplitude);
                }
            }
        }
        pose
    }
}

/// Ratio of the configured speed to the state's reference speed.
#[must_use]
pub fn playback_rate(speed: f32, state: LocomotionState) -> f32 {
    speed / state.reference_speed()
}

/// Additive idle motion: chest breathing, hip sway and a counter head bob.
pub fn apply_idle_layer(pose: &mut Pose, config: &LocomotionConfig, time: f32) {
    let phase = time * config.speed;
    let breath = phase.sin();

    pose.add_rotation(Bone::Chest, Vec3::new(config.amplitude * breath, 0.0, 0.0));
    pose.add_rotation(Bone::Hips, Vec3::new(0.0, 0.0, config.sway * breath));
    pose.add_rotation(
        Bone::Head,
        Vec3::new(-0.5 * config.amplitude * breath, 0.0, 0.0),
    );
}

/// Procedural walk/run cycle.
#[must_use]
pub fn gait_pose(state: LocomotionState, config: &LocomotionConfig, input: &LocomotionInput) -> Pose {
    let mut pose = Pose::identity();
    let phase = input.time * config.speed;
    let s = phase.sin();

    // Legs: opposite halves of the same cycle; knees only flex one way.
    let left_swing = config.leg_amplitude * s;
    let right_swing = -left_swing;
    let left_knee = config.knee_bend * (-s).max(0.0);
    let right_knee = config.knee_bend * s.max(0.0);

    pose.set_rotation(Bone::LeftThigh, Vec3::new(left_swing, 0.0, config.step_width));
    pose.set_rotation(Bone::RightThigh, Vec3::new(right_swing, 0.0, -config.step_width));
    pose.set_rotation(Bone::LeftCalf, Vec3::new(left_knee, 0.0, 0.0));
    pose.set_rotation(Bone::RightCalf, Vec3::new(right_knee, 0.0, 0.0));
    pose.set_rotation(
        Bone::LeftFoot,
        Vec3::new(-FOOT_COMPENSATION * left_knee, 0.0, 0.0),
    );
    pose.set_rotation(
        Bone::RightFoot,
        Vec3::new(-FOOT_COMPENSATION * right_knee, 0.0, 0.0),
    );

    // Root bounces twice per cycle.
    pose.set_root_translation(Vec3::new(0.0, s.abs() * config.bounciness, 0.0));

    // Arms counter-swing the legs on the same side.
    let arm_swing = config.arm_amplitude * s;
    let arm_drop = config.arm_rotation - config.arm_span;
    pose.set_rotation(Bone::LeftArm, Vec3::new(-arm_swing, 0.0, -arm_drop));
    pose.set_rotation(Bone::RightArm, Vec3::new(arm_swing, 0.0, arm_drop));
    pose.set_rotation(
        Bone::LeftForearm,
        Vec3::new(-FOREARM_FOLLOW * config.arm_amplitude * s.max(0.0), 0.0, 0.0),
    );
    pose.set_rotation(
        Bone::RightForearm,
        Vec3::new(-FOREARM_FOLLOW * config.arm_amplitude * (-s).max(0.0), 0.0, 0.0),
    );

    // Torso: yaw against the intent direction, or lean when backing up.
    let mut chest = Vec3::ZERO;
    if input.intent.length_squared() > MIN_INTENT * MIN_INTENT {
        if input.intent.y < 0.0 {
            chest.x += BACKWARD_LEAN;
        } else {
            let angle = input.intent.x.atan2(input.intent.y).clamp(-FRAC_PI_2, FRAC_PI_2);
            chest.y -= angle * TORSO_COUNTER_YAW;
        }
    }
    if state == LocomotionState::Run {
        chest.y += config.spine_rotation * s;
    }
    pose.set_rotation(Bone::Chest, chest);

    // Pelvis turns with the forward leg; the head holds against the torso.
    let hips = Vec3::new(0.0, HIP_TWIST * left_swing, 0.0);
    pose.set_rotation(Bone::Hips, hips);
    pose.set_rotation(
        Bone::Head,
        Vec3::new(
            -HEAD_STABILIZATION * chest.x,
            -HEAD_STABILIZATION * (hips.y + chest.y),
            0.0,
        ),
    );

    pose
}
