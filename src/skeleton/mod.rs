//! Skeleton Topology
//!
//! The fixed humanoid hierarchy and its rest pose:
//! - [`Bone`]: closed set of joints, parents declared before children
//! - [`BoneMap`]: sparse per-bone table used by keyframes and pose fragments
//! - [`Skeleton`]: rest offsets and rest rotations for one rig

mod bone;
mod topology;

pub use bone::{Bone, BoneMap};
pub use topology::Skeleton;
