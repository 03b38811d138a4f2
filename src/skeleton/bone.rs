use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::errors::RigError;

/// A joint of the fixed humanoid skeleton.
///
/// The set is closed: bones are never added or removed at runtime, so every
/// per-bone table in the crate is a fixed-size array indexed by
/// [`Bone::index`]. Variants are declared parents-first, which makes
/// [`Bone::ALL`] a valid hierarchy traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Bone {
    Hips,
    Chest,
    Head,
    LeftArm,
    LeftForearm,
    LeftHand,
    RightArm,
    RightForearm,
    RightHand,
    LeftThigh,
    LeftCalf,
    LeftFoot,
    RightThigh,
    RightCalf,
    RightFoot,
}

impl Bone {
    pub const COUNT: usize = 15;

    /// Every bone, parents before children.
    pub const ALL: [Bone; Bone::COUNT] = [
        Bone::Hips,
        Bone::Chest,
        Bone::Head,
        Bone::LeftArm,
        Bone::LeftForearm,
        Bone::LeftHand,
        Bone::RightArm,
        Bone::RightForearm,
        Bone::RightHand,
        Bone::LeftThigh,
        Bone::LeftCalf,
        Bone::LeftFoot,
        Bone::RightThigh,
        Bone::RightCalf,
        Bone::RightFoot,
    ];

    /// The only bone allowed to carry a translation.
    pub const ROOT: Bone = Bone::Hips;

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Bone::Hips => "hips",
            Bone::Chest => "chest",
            Bone::Head => "head",
            Bone::LeftArm => "left_arm",
            Bone::LeftForearm => "left_forearm",
            Bone::LeftHand => "left_hand",
            Bone::RightArm => "right_arm",
            Bone::RightForearm => "right_forearm",
            Bone::RightHand => "right_hand",
            Bone::LeftThigh => "left_thigh",
            Bone::LeftCalf => "left_calf",
            Bone::LeftFoot => "left_foot",
            Bone::RightThigh => "right_thigh",
            Bone::RightCalf => "right_calf",
            Bone::RightFoot => "right_foot",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Bone> {
        Bone::ALL.into_iter().find(|bone| bone.name() == name)
    }

    /// Parent joint, `None` for the root.
    #[must_use]
    pub const fn parent(self) -> Option<Bone> {
        match self {
            Bone::Hips => None,
            Bone::Chest | Bone::LeftThigh | Bone::RightThigh => Some(Bone::Hips),
            Bone::Head | Bone::LeftArm | Bone::RightArm => Some(Bone::Chest),
            Bone::LeftForearm => Some(Bone::LeftArm),
            Bone::LeftHand => Some(Bone::LeftForearm),
            Bone::RightForearm => Some(Bone::RightArm),
            Bone::RightHand => Some(Bone::RightForearm),
            Bone::LeftCalf => Some(Bone::LeftThigh),
            Bone::LeftFoot => Some(Bone::LeftCalf),
            Bone::RightCalf => Some(Bone::RightThigh),
            Bone::RightFoot => Some(Bone::RightCalf),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self, Bone::Hips)
    }

    #[must_use]
    pub const fn is_leg(self) -> bool {
        matches!(
            self,
            Bone::LeftThigh
                | Bone::LeftCalf
                | Bone::LeftFoot
                | Bone::RightThigh
                | Bone::RightCalf
                | Bone::RightFoot
        )
    }

    #[must_use]
    pub const fn is_arm(self) -> bool {
        matches!(
            self,
            Bone::LeftArm
                | Bone::LeftForearm
                | Bone::LeftHand
                | Bone::RightArm
                | Bone::RightForearm
                | Bone::RightHand
        )
    }

    /// Chest, head and both arms.
    #[must_use]
    pub const fn is_upper_body(self) -> bool {
        matches!(self, Bone::Chest | Bone::Head) || self.is_arm()
    }
}

impl fmt::Display for Bone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bone {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bone::from_name(s).ok_or_else(|| RigError::UnknownBone(s.to_string()))
    }
}

impl TryFrom<String> for Bone {
    type Error = RigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bone> for &'static str {
    fn from(bone: Bone) -> Self {
        bone.name()
    }
}

// ============================================================================
// BoneMap
// ============================================================================

/// Sparse per-bone table backed by a fixed array.
///
/// Serialized as a JSON object keyed by bone name.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneMap<T> {
    slots: [Option<T>; Bone::COUNT],
}

impl<T> BoneMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone: Bone) -> Option<&T> {
        self.slots[bone.index()].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, bone: Bone) -> Option<&mut T> {
        self.slots[bone.index()].as_mut()
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, bone: Bone, value: T) -> Option<T> {
        self.slots[bone.index()].replace(value)
    }

    pub fn remove(&mut self, bone: Bone) -> Option<T> {
        self.slots[bone.index()].take()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, bone: Bone) -> bool {
        self.slots[bone.index()].is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Occupied entries in hierarchy order.
    pub fn iter(&self) -> impl Iterator<Item = (Bone, &T)> {
        Bone::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(bone, slot)| slot.as_ref().map(|value| (bone, value)))
    }
}

impl<T> Default for BoneMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(Bone, T)> for BoneMap<T> {
    fn from_iter<I: IntoIterator<Item = (Bone, T)>>(iter: I) -> Self {
        let mut map = BoneMap::new();
        for (bone, value) in iter {
            map.insert(bone, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for BoneMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(bone, value)| (bone.name(), value)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for BoneMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<Bone, T>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_parents_first() {
        for (i, bone) in Bone::ALL.iter().enumerate() {
            assert_eq!(bone.index(), i);
            if let Some(parent) = bone.parent() {
                assert!(parent.index() < i, "{bone} listed before its parent");
            }
        }
    }

    #[test]
    fn names_round_trip_and_unknown_is_rejected() {
        for bone in Bone::ALL {
            assert_eq!(Bone::from_name(bone.name()), Some(bone));
        }
        assert!(matches!(
            "tail".parse::<Bone>(),
            Err(RigError::UnknownBone(name)) if name == "tail"
        ));
    }

    #[test]
    fn bone_map_skips_empty_slots() {
        let mut map = BoneMap::new();
        map.insert(Bone::Head, 1);
        map.insert(Bone::Hips, 2);
        let entries: Vec<_> = map.iter().map(|(b, v)| (b, *v)).collect();
        assert_eq!(entries, vec![(Bone::Hips, 2), (Bone::Head, 1)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.remove(Bone::Head), Some(1));
        assert!(!map.contains(Bone::Head));

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }
}
