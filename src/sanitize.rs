//! Lenient number handling for authored data.
//!
//! Authored clips and configs come from editor tooling and may contain
//! vectors of the wrong length, strings where numbers belong, or NaN.
//! These helpers turn such values into safe defaults at load time so the
//! per-frame code can assume finite numbers.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::skeleton::{Bone, BoneMap};

/// Replaces non-finite components with zero.
#[inline]
#[must_use]
pub fn finite_or_zero(v: Vec3) -> Vec3 {
    Vec3::new(finite(v.x), finite(v.y), finite(v.z))
}

#[inline]
fn finite(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

/// Reads a 3-vector from `[x, y, z]` or `{ "x": .., "y": .., "z": .. }`.
///
/// Returns `None` for anything else, including arrays of the wrong length
/// and non-finite components.
#[must_use]
pub fn vec3_from_value(value: &Value) -> Option<Vec3> {
    let components = match value {
        Value::Array(items) if items.len() == 3 => {
            [items[0].as_f64(), items[1].as_f64(), items[2].as_f64()]
        }
        Value::Object(fields) => [
            fields.get("x").and_then(Value::as_f64),
            fields.get("y").and_then(Value::as_f64),
            fields.get("z").and_then(Value::as_f64),
        ],
        _ => return None,
    };
    let [Some(x), Some(y), Some(z)] = components else {
        return None;
    };
    let v = Vec3::new(x as f32, y as f32, z as f32);
    v.is_finite().then_some(v)
}

/// Deserializes a bone-keyed map of vectors, substituting zero for malformed
/// entries. Unknown bone names are still an error.
pub fn bone_vectors<'de, D>(deserializer: D) -> Result<BoneMap<Vec3>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<Bone, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(bone, value)| {
            let v = vec3_from_value(&value).unwrap_or_else(|| {
                log::warn!("Malformed vector for bone '{bone}': {value}; using zero");
                Vec3::ZERO
            });
            (bone, v)
        })
        .collect())
}

/// Deserializes an optional number, treating non-numeric or non-finite
/// values as missing.
pub fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_f64().map(|x| x as f32) {
            Some(x) if x.is_finite() => Some(x),
            _ => {
                log::warn!("Ignoring non-numeric config value {value}");
                None
            }
        },
    })
}

/// Deserializes an optional string, treating any other JSON value as missing.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(value) => {
            log::warn!("Ignoring non-string config value {value}");
            None
        }
    })
}

/// Deserializes a nested config object, falling back to its default when
/// the value is null or not an object of the expected shape.
pub fn lenient_section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed config section: {err}");
            T::default()
        }),
    })
}
