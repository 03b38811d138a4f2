use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::tracks::{BoneChannel, InterpolationMode};
use crate::animation::values::ChannelKind;
use crate::errors::{Result, RigError};
use crate::pose::PoseLayer;
use crate::sanitize;
use crate::skeleton::{Bone, BoneMap};

/// A sparse keyframe: only the bones it names are keyed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Normalized time in [0, 1].
    pub time: f32,
    #[serde(default, deserialize_with = "sanitize::bone_vectors")]
    pub rotations: BoneMap<Vec3>,
    /// In practice only the root is keyed here.
    #[serde(default, deserialize_with = "sanitize::bone_vectors")]
    pub translations: BoneMap<Vec3>,
}

impl Keyframe {
    #[must_use]
    pub fn new(time: f32) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, bone: Bone, rotation: Vec3) -> Self {
        self.rotations.insert(bone, rotation);
        self
    }

    #[must_use]
    pub fn with_translation(mut self, bone: Bone, translation: Vec3) -> Self {
        self.translations.insert(bone, translation);
        self
    }

    #[inline]
    #[must_use]
    pub fn value(&self, bone: Bone, kind: ChannelKind) -> Option<Vec3> {
        match kind {
            ChannelKind::Rotation => self.rotations.get(bone).copied(),
            ChannelKind::Translation => self.translations.get(bone).copied(),
        }
    }
}

/// UI grouping tag. Never consulted by the pose math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionCategory {
    Idle,
    Walk,
    Run,
    Attack,
    #[default]
    Special,
}

/// An authored clip ("action"): a time-addressable function per bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionClip {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub interpolation: InterpolationMode,
    #[serde(default)]
    pub category: ActionCategory,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl ActionClip {
    #[must_use]
    pub fn new(id: &str, duration: f32, keyframes: Vec<Keyframe>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            duration,
            looping: true,
            interpolation: InterpolationMode::Linear,
            category: ActionCategory::Special,
            keyframes,
        }
    }

    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ActionCategory) -> Self {
        self.category = category;
        self
    }

    /// Cleans authored data in place and rejects clips that cannot be
    /// sampled at all.
    ///
    /// Keyframe times are clamped to [0, 1] and a non-finite or negative
    /// duration becomes zero.
    pub fn validate(&mut self) -> Result<()> {
        if self.id.is_empty() {
            return Err(RigError::InvalidAction {
                id: self.id.clone(),
                reason: "empty id".to_string(),
            });
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            log::warn!(
                "Action '{}' has invalid duration {}; using 0",
                self.id,
                self.duration
            );
            self.duration = 0.0;
        }
        for keyframe in &mut self.keyframes {
            if !keyframe.time.is_finite() {
                return Err(RigError::InvalidAction {
                    id: self.id.clone(),
                    reason: format!("non-finite keyframe time {}", keyframe.time),
                });
            }
            keyframe.time = keyframe.time.clamp(0.0, 1.0);
        }
        if self.keyframes.is_empty() {
            log::warn!("Action '{}' has no keyframes", self.id);
        }
        Ok(())
    }

    /// Gathers the keys of one bone/kind pair, sorted by time.
    #[must_use]
    pub fn channel(&self, bone: Bone, kind: ChannelKind) -> BoneChannel {
        BoneChannel::from_keys(
            self.keyframes
                .iter()
                .filter_map(|kf| kf.value(bone, kind).map(|v| (kf.time, v))),
        )
    }

    /// Samples one bone at normalized time `time` using the clip's own
    /// interpolation mode.
    ///
    /// `None` means the clip does not key this bone/kind and the caller
    /// should fall back to another pose source.
    #[must_use]
    pub fn sample(&self, time: f32, bone: Bone, kind: ChannelKind) -> Option<Vec3> {
        self.sample_with(time, bone, kind, false)
    }

    /// Like [`sample`](Self::sample); `stepped` forces step interpolation
    /// regardless of the clip's mode (raw key preview in pose editors).
    #[must_use]
    pub fn sample_with(
        &self,
        time: f32,
        bone: Bone,
        kind: ChannelKind,
        stepped: bool,
    ) -> Option<Vec3> {
        let mode = if stepped {
            InterpolationMode::Step
        } else {
            self.interpolation
        };
        self.channel(bone, kind).sample(time, self.looping, mode, kind)
    }

    /// Samples every bone the clip keys.
    #[must_use]
    pub fn sample_pose(&self, time: f32, stepped: bool) -> PoseLayer {
        let mut layer = PoseLayer::new();
        for bone in Bone::ALL {
            if let Some(rotation) = self.sample_with(time, bone, ChannelKind::Rotation, stepped) {
                layer.rotations.insert(bone, rotation);
            }
        }
        if let Some(translation) =
            self.sample_with(time, Bone::ROOT, ChannelKind::Translation, stepped)
        {
            layer.translations.insert(Bone::ROOT, translation);
        }
        layer
    }

    /// Maps accumulated seconds onto the clip's normalized timeline, played
    /// back `rate` times faster than authored.
    ///
    /// Wraps modulo the duration; a zero-length clip always reports 0.
    #[must_use]
    pub fn normalized_time_at(&self, elapsed: f32, rate: f32) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let local = (elapsed * rate).rem_euclid(self.duration);
        (local / self.duration).clamp(0.0, 1.0)
    }
}
