use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// What a keyframe channel animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Euler XYZ angles in radians.
    Rotation,
    /// Root translation.
    Translation,
}

impl ChannelKind {
    /// Blends two samples of this kind.
    ///
    /// Translations interpolate component-wise. Rotations interpolate each
    /// axis along the shortest arc, so 3.0 → -3.0 passes through ±π rather
    /// than through zero.
    #[inline]
    #[must_use]
    pub fn blend(self, start: Vec3, end: Vec3, t: f32) -> Vec3 {
        match self {
            ChannelKind::Translation => start.lerp(end, t),
            ChannelKind::Rotation => lerp_euler(start, end, t),
        }
    }
}

/// Wraps an angle into (−π, π].
#[inline]
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Shortest-arc interpolation of a single angle.
#[inline]
#[must_use]
pub fn lerp_angle(start: f32, end: f32, t: f32) -> f32 {
    start + wrap_angle(end - start) * t
}

/// Shortest-arc interpolation of Euler angles, axis by axis.
#[inline]
#[must_use]
pub fn lerp_euler(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        lerp_angle(start.x, end.x, t),
        lerp_angle(start.y, end.y, t),
        lerp_angle(start.z, end.z, t),
    )
}

/// Cosine ease-in-out remap of a blend factor in [0, 1].
#[inline]
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    (1.0 - (PI * t).cos()) / 2.0
}
