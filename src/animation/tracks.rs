use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::animation::values::{ChannelKind, ease_in_out};

/// How values between two keyframes are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterpolationMode {
    /// Hold the previous key until the next one.
    Step,
    #[default]
    Linear,
    /// Cosine ease between keys.
    EaseInOut,
}

// Durations below this are treated as coincident keys.
const MIN_SEGMENT: f32 = 1e-6;

/// Time-sorted keys of one bone/kind pair, gathered from a clip's sparse
/// keyframes.
///
/// Two bones of the same clip can have completely different key times, so
/// channels are built per bone rather than per keyframe.
#[derive(Debug, Clone, Default)]
pub struct BoneChannel {
    keys: SmallVec<[(f32, Vec3); 8]>,
}

impl BoneChannel {
    /// Builds a channel from unordered `(time, value)` keys.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, Vec3)>) -> Self {
        let mut keys: SmallVec<[(f32, Vec3); 8]> = keys.into_iter().collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn times(&self) -> SmallVec<[f32; 8]> {
        self.keys.iter().map(|(t, _)| *t).collect()
    }

    /// Samples the channel at normalized time `time`.
    ///
    /// Returns `None` only for an empty channel.
    #[must_use]
    pub fn sample(
        &self,
        time: f32,
        looping: bool,
        mode: InterpolationMode,
        kind: ChannelKind,
    ) -> Option<Vec3> {
        let len = self.keys.len();
        match len {
            0 => return None,
            // Fast path: static data
            1 => return Some(self.keys[0].1),
            _ => {}
        }

        // First index whose time is strictly greater than `time`
        let next_idx = self.keys.partition_point(|&(t, _)| t <= time);

        let (prev, next, elapsed, duration) = if next_idx == 0 {
            // Before the first key
            let first = self.keys[0];
            if !looping {
                return Some(first.1);
            }
            let last = self.keys[len - 1];
            let lead_out = 1.0 - last.0;
            (last, first, lead_out + time, lead_out + first.0)
        } else if next_idx >= len {
            // Past the last key
            let last = self.keys[len - 1];
            if !looping {
                return Some(last.1);
            }
            let first = self.keys[0];
            (last, first, time - last.0, (1.0 - last.0) + first.0)
        } else {
            let prev = self.keys[next_idx - 1];
            let next = self.keys[next_idx];
            (prev, next, time - prev.0, next.0 - prev.0)
        };

        let alpha = if duration > MIN_SEGMENT {
            (elapsed / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(match mode {
            InterpolationMode::Step => prev.1,
            InterpolationMode::Linear => kind.blend(prev.1, next.1, alpha),
            InterpolationMode::EaseInOut => kind.blend(prev.1, next.1, ease_in_out(alpha)),
        })
    }
}
