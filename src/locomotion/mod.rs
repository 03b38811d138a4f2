//! Procedural Locomotion
//!
//! Continuous idle / walk / run motion driven by scalar knobs and the
//! accumulated clock, optionally layered over a linked keyframe clip.

pub mod config;
pub mod procedural;

pub use config::{
    AttackConfig, BASE_ATTACK_DURATION, LocomotionConfig, LocomotionConfigs, LocomotionState,
    PartialAttackConfig, PartialLocomotionConfig, PartialLocomotionConfigs,
};
pub use procedural::{Locomotion, LocomotionInput, apply_idle_layer, gait_pose, playback_rate};
