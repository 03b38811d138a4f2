//! Pose Compositor
//!
//! Folds the pose sources of one frame into a single [`Pose`]. Precedence,
//! evaluated independently per bone and per value kind:
//!
//! 1. Manual override (editor)
//! 2. Scrubbed custom action
//! 3. Attack overlay
//! 4. Locomotion (procedural or linked clip)
//!
//! "Force rest pose" short-circuits everything.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::animation::ActionLibrary;
use crate::attack::{AttackOverlay, AttackPhase};
use crate::clock::AnimatorState;
use crate::locomotion::{Locomotion, LocomotionConfigs, LocomotionInput, LocomotionState};
use crate::pose::{Pose, PoseLayer};
use crate::skeleton::{Bone, Skeleton};

/// A provider of per-bone values. `None` means "no opinion", letting the
/// next source in precedence order decide.
pub trait PoseSource {
    fn rotation(&self, bone: Bone) -> Option<Vec3>;

    fn root_translation(&self) -> Option<Vec3>;
}

impl PoseSource for Pose {
    #[inline]
    fn rotation(&self, bone: Bone) -> Option<Vec3> {
        Some(Pose::rotation(self, bone))
    }

    #[inline]
    fn root_translation(&self) -> Option<Vec3> {
        Some(Pose::root_translation(self))
    }
}

impl PoseSource for PoseLayer {
    #[inline]
    fn rotation(&self, bone: Bone) -> Option<Vec3> {
        PoseLayer::rotation(self, bone)
    }

    #[inline]
    fn root_translation(&self) -> Option<Vec3> {
        PoseLayer::root_translation(self)
    }
}

/// Folds `sources`, highest precedence first. Bones no source speaks for
/// stay at identity.
#[must_use]
pub fn fold_sources(sources: &[&dyn PoseSource]) -> Pose {
    let mut pose = Pose::identity();
    for bone in Bone::ALL {
        if let Some(rotation) = sources.iter().find_map(|source| source.rotation(bone)) {
            pose.set_rotation(bone, rotation);
        }
    }
    if let Some(translation) = sources.iter().find_map(|source| source.root_translation()) {
        pose.set_root_translation(translation);
    }
    pose
}

/// Editor request to drive a specific clip at an explicit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubRequest<'a> {
    pub action_id: &'a str,
    /// Normalized clip time in [0, 1].
    pub time: f32,
    /// Preview raw keys without interpolation.
    pub stepped: bool,
}

/// Everything supplied by collaborators for one frame. Nothing here is
/// mutated by the compositor.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub state: LocomotionState,
    /// Movement intent: `x` lateral, `y` forward.
    pub intent: Vec2,
    pub moving: bool,
    pub configs: &'a LocomotionConfigs,
    pub library: &'a ActionLibrary,
    /// Host timestamp of the last attack request.
    pub last_attack_time: Option<f64>,
    pub overrides: Option<&'a PoseLayer>,
    pub scrub: Option<ScrubRequest<'a>>,
}

impl<'a> FrameInputs<'a> {
    /// Idle, not moving, no attack, no editor input.
    #[must_use]
    pub fn new(configs: &'a LocomotionConfigs, library: &'a ActionLibrary) -> Self {
        Self {
            state: LocomotionState::Idle,
            intent: Vec2::ZERO,
            moving: false,
            configs,
            library,
            last_attack_time: None,
            overrides: None,
            scrub: None,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: LocomotionState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_movement(mut self, intent: Vec2, moving: bool) -> Self {
        self.intent = intent;
        self.moving = moving;
        self
    }

    #[must_use]
    pub fn with_last_attack_time(mut self, time: Option<f64>) -> Self {
        self.last_attack_time = time;
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &'a PoseLayer) -> Self {
        self.overrides = Some(overrides);
        self
    }

    #[must_use]
    pub fn with_scrub(mut self, scrub: ScrubRequest<'a>) -> Self {
        self.scrub = Some(scrub);
        self
    }
}

/// Computes the final pose for the current clock time.
///
/// Only attack edge detection touches `state`; the clock is advanced by the
/// caller. Poses are sampled at [`AnimationClock::now`], the attack timeline
/// runs on [`AnimationClock::elapsed`] so freezing neither drops nor rewinds
/// an attack.
///
/// [`AnimationClock::now`]: crate::clock::AnimationClock::now
/// [`AnimationClock::elapsed`]: crate::clock::AnimationClock::elapsed
pub fn compute_pose(state: &mut AnimatorState, skeleton: &Skeleton, inputs: &FrameInputs<'_>) -> Pose {
    if state.force_rest_pose {
        return skeleton.rest_pose();
    }

    let now = state.clock.now();
    let elapsed = state.clock.elapsed();
    state.attack.observe(inputs.last_attack_time, elapsed);

    let base = Locomotion::new(inputs.configs, inputs.library).pose(&LocomotionInput {
        state: inputs.state,
        time: now,
        intent: inputs.intent,
        moving: inputs.moving,
    });

    let overlay_source = AttackOverlay::new(&inputs.configs.attack, inputs.library);
    let phase = state
        .attack
        .time_since(elapsed)
        .map_or(AttackPhase::Dormant, |since| overlay_source.timing().phase(since));
    if !phase.is_active() {
        state.attack.finish();
    }
    let overlay = overlay_source.layer(phase, &base, inputs.moving);

    let scrubbed = inputs.scrub.and_then(|scrub| {
        let layer = inputs
            .library
            .get(scrub.action_id)
            .map(|clip| clip.sample_pose(scrub.time, scrub.stepped));
        if layer.is_none() {
            log::trace!("Scrubbed action '{}' is not loaded", scrub.action_id);
        }
        layer
    });

    let mut sources: SmallVec<[&dyn PoseSource; 4]> = SmallVec::new();
    if let Some(overrides) = inputs.overrides {
        sources.push(overrides);
    }
    if let Some(scrubbed) = &scrubbed {
        sources.push(scrubbed);
    }
    if let Some(overlay) = &overlay {
        sources.push(overlay);
    }
    sources.push(&base);

    fold_sources(&sources)
}
