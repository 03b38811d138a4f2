//! Keyframe Animation
//!
//! Authored clips and the interpolator that reads them:
//! - [`ActionClip`] / [`Keyframe`]: sparse, per-bone keyed clips
//! - [`BoneChannel`]: one bone's keys, sorted, sampled with loop wrap
//! - [`ActionLibrary`]: loaded clips addressed by id
//! - [`values`]: shortest-arc angle blending and easing

pub mod clip;
pub mod library;
pub mod tracks;
pub mod values;

pub use clip::{ActionCategory, ActionClip, Keyframe};
pub use library::ActionLibrary;
pub use tracks::{BoneChannel, InterpolationMode};
pub use values::ChannelKind;
