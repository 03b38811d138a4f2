#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Skeletal pose synthesis for stylized humanoid rigs.
//!
//! Every frame the [`compositor`] folds procedural locomotion, an attack
//! overlay, scrubbed keyframe clips and manual overrides into one [`Pose`],
//! which a [`RigAnimator`] writes into a host [`TransformSink`].

pub mod animation;
pub mod attack;
pub mod clock;
pub mod compositor;
pub mod errors;
pub mod locomotion;
pub mod pose;
pub mod rig;
pub mod sanitize;
pub mod skeleton;

pub use animation::{
    ActionCategory, ActionClip, ActionLibrary, ChannelKind, InterpolationMode, Keyframe,
};
pub use attack::{AttackOverlay, AttackPhase, AttackTiming};
pub use clock::{AnimationClock, AnimatorState, AttackTrigger};
pub use compositor::{FrameInputs, PoseSource, ScrubRequest, compute_pose, fold_sources};
pub use errors::RigError;
pub use locomotion::{AttackConfig, LocomotionConfig, LocomotionConfigs, LocomotionState};
pub use pose::{Pose, PoseLayer};
pub use rig::{BoneTransform, BoneTransforms, RigAnimator, TransformSink, write_pose};
pub use skeleton::{Bone, BoneMap, Skeleton};
