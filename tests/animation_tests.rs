//! Keyframe Animation Tests
//!
//! Tests for:
//! - BoneChannel linear/step/ease-in-out sampling
//! - Loop wrap across the clip seam and clamping for one-shot clips
//! - Shortest-arc angle interpolation
//! - Sparse keyframes and per-bone fall-through
//! - ActionClip re-timing and ActionLibrary loading

use std::f32::consts::PI;

use glam::Vec3;

use rigmotion::animation::{ActionCategory, BoneChannel};
use rigmotion::animation::values::{ease_in_out, lerp_angle, wrap_angle};
use rigmotion::{
    ActionClip, ActionLibrary, Bone, ChannelKind, InterpolationMode, Keyframe, RigError,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn x(v: f32) -> Vec3 {
    Vec3::new(v, 0.0, 0.0)
}

/// Two head keys at 0.25 (x = 0) and 0.75 (x = 1).
fn seam_clip(looping: bool) -> ActionClip {
    ActionClip::new(
        "seam",
        1.0,
        vec![
            Keyframe::new(0.25).with_rotation(Bone::Head, x(0.0)),
            Keyframe::new(0.75).with_rotation(Bone::Head, x(1.0)),
        ],
    )
    .with_looping(looping)
}

fn head_x(clip: &ActionClip, t: f32) -> f32 {
    clip.sample(t, Bone::Head, ChannelKind::Rotation).unwrap().x
}

// ============================================================================
// BoneChannel: Interpolation Modes
// ============================================================================

#[test]
fn linear_midpoint() {
    let channel = BoneChannel::from_keys([(0.0, x(0.0)), (1.0, x(1.0))]);
    let v = channel
        .sample(0.5, false, InterpolationMode::Linear, ChannelKind::Rotation)
        .unwrap();
    assert!(approx(v.x, 0.5), "Expected 0.5, got {}", v.x);
}

#[test]
fn linear_hits_keys_exactly() {
    let channel = BoneChannel::from_keys([(0.0, x(0.0)), (0.5, x(1.0)), (1.0, x(2.0))]);
    for (t, expected) in [(0.0, 0.0), (0.5, 1.0), (1.0, 2.0)] {
        let v = channel
            .sample(t, true, InterpolationMode::Linear, ChannelKind::Rotation)
            .unwrap();
        assert!(approx(v.x, expected), "t={t}: expected {expected}, got {}", v.x);
    }
}

#[test]
fn step_holds_previous_key() {
    let channel = BoneChannel::from_keys([(0.0, x(0.0)), (0.5, x(1.0)), (1.0, x(2.0))]);
    let sample = |t| {
        channel
            .sample(t, false, InterpolationMode::Step, ChannelKind::Rotation)
            .unwrap()
            .x
    };
    assert!(approx(sample(0.49), 0.0));
    assert!(approx(sample(0.5), 1.0));
    assert!(approx(sample(0.99), 1.0));
}

#[test]
fn ease_in_out_remaps_blend_factor() {
    let channel = BoneChannel::from_keys([(0.0, x(0.0)), (1.0, x(1.0))]);
    let v = channel
        .sample(0.25, false, InterpolationMode::EaseInOut, ChannelKind::Rotation)
        .unwrap();
    let expected = (1.0 - (PI * 0.25).cos()) / 2.0;
    assert!(approx(v.x, expected), "Expected {expected}, got {}", v.x);
    assert!(approx(ease_in_out(0.5), 0.5));
    assert!(approx(ease_in_out(0.0), 0.0));
    assert!(approx(ease_in_out(1.0), 1.0));
}

#[test]
fn single_key_is_constant() {
    let channel = BoneChannel::from_keys([(0.4, x(0.7))]);
    for t in [0.0, 0.4, 0.9] {
        let v = channel
            .sample(t, true, InterpolationMode::Linear, ChannelKind::Rotation)
            .unwrap();
        assert!(approx(v.x, 0.7));
    }
}

#[test]
fn translation_interpolates_componentwise() {
    let channel = BoneChannel::from_keys([
        (0.0, Vec3::new(0.0, 0.0, 0.0)),
        (1.0, Vec3::new(4.0, -2.0, 8.0)),
    ]);
    let v = channel
        .sample(0.25, false, InterpolationMode::Linear, ChannelKind::Translation)
        .unwrap();
    assert!(v.abs_diff_eq(Vec3::new(1.0, -0.5, 2.0), EPSILON), "{v}");
}

// ============================================================================
// Shortest-Arc Angles
// ============================================================================

#[test]
fn wrap_angle_stays_in_half_open_range() {
    for angle in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 10.0] {
        let w = wrap_angle(angle);
        assert!(w > -PI - EPSILON && w <= PI + EPSILON, "{angle} -> {w}");
    }
}

#[test]
fn rotation_crosses_pi_not_zero() {
    let channel = BoneChannel::from_keys([(0.0, x(3.0)), (1.0, x(-3.0))]);
    let v = channel
        .sample(0.5, false, InterpolationMode::Linear, ChannelKind::Rotation)
        .unwrap();
    assert!(
        wrap_angle(v.x).abs() > 3.0,
        "midpoint should be near ±π, got {}",
        v.x
    );
    assert!((wrap_angle(v.x).abs() - PI).abs() < 1e-4);
}

#[test]
fn lerp_angle_takes_short_way() {
    // 0.1 → 2π − 0.1 is a 0.2 rad step backwards, not 6.08 forwards.
    let mid = lerp_angle(0.1, 2.0 * PI - 0.1, 0.5);
    assert!(wrap_angle(mid).abs() < 1e-4, "got {mid}");
}

// ============================================================================
// Looping
// ============================================================================

#[test]
fn looping_wraps_past_last_key() {
    let clip = seam_clip(true);
    // 0.875 is halfway between 0.75 and the wrapped 1.25.
    let v = head_x(&clip, 0.875);
    assert!(approx(v, 0.75), "Expected 0.75, got {v}");
}

#[test]
fn looping_wraps_before_first_key() {
    let clip = seam_clip(true);
    let v = head_x(&clip, 0.125);
    assert!(approx(v, 0.25), "Expected 0.25, got {v}");
}

#[test]
fn loop_seam_is_continuous() {
    let clip = seam_clip(true);
    let end = head_x(&clip, 1.0);
    let start = head_x(&clip, 0.0);
    assert!(approx(end, start), "seam jump: {end} vs {start}");
}

#[test]
fn one_shot_clamps_outside_keys() {
    let clip = seam_clip(false);
    assert!(approx(head_x(&clip, 0.0), 0.0));
    assert!(approx(head_x(&clip, 0.125), 0.0));
    assert!(approx(head_x(&clip, 0.875), 1.0));
    assert!(approx(head_x(&clip, 1.0), 1.0));
}

// ============================================================================
// Sparse Keyframes
// ============================================================================

#[test]
fn bones_have_independent_key_times() {
    let clip = ActionClip::new(
        "sparse",
        1.0,
        vec![
            Keyframe::new(0.0)
                .with_rotation(Bone::Head, x(0.0))
                .with_rotation(Bone::Chest, x(0.0)),
            Keyframe::new(0.5).with_rotation(Bone::Head, x(1.0)),
            Keyframe::new(1.0).with_rotation(Bone::Chest, x(1.0)),
        ],
    )
    .with_looping(false);

    assert!(approx(head_x(&clip, 0.25), 0.5));
    let chest = clip.sample(0.25, Bone::Chest, ChannelKind::Rotation).unwrap();
    assert!(approx(chest.x, 0.25));
}

#[test]
fn unkeyed_bone_yields_no_sample() {
    let clip = seam_clip(true);
    assert!(clip.sample(0.5, Bone::LeftFoot, ChannelKind::Rotation).is_none());
    assert!(clip.sample(0.5, Bone::Hips, ChannelKind::Translation).is_none());

    let layer = clip.sample_pose(0.5, false);
    assert!(layer.rotation(Bone::Head).is_some());
    assert!(layer.rotation(Bone::LeftFoot).is_none());
    assert!(layer.root_translation().is_none());
}

#[test]
fn stepped_preview_overrides_clip_mode() {
    let clip = seam_clip(false);
    let v = clip
        .sample_with(0.5, Bone::Head, ChannelKind::Rotation, true)
        .unwrap();
    assert!(approx(v.x, 0.0));
}

#[test]
fn empty_clip_contributes_nothing() {
    let clip = ActionClip::new("empty", 1.0, Vec::new());
    assert!(clip.sample_pose(0.3, false).is_empty());
}

// ============================================================================
// Re-timing
// ============================================================================

#[test]
fn normalized_time_wraps_over_duration() {
    let clip = ActionClip::new("t", 2.0, Vec::new());
    assert!(approx(clip.normalized_time_at(5.0, 1.0), 0.5));
    assert!(approx(clip.normalized_time_at(1.0, 2.0), 0.0));
    assert!(approx(clip.normalized_time_at(0.5, 1.5), 0.375));
}

#[test]
fn zero_duration_reports_start() {
    let clip = ActionClip::new("t", 0.0, Vec::new());
    assert!(approx(clip.normalized_time_at(3.7, 1.0), 0.0));
}

// ============================================================================
// ActionLibrary
// ============================================================================

const WAVE_JSON: &str = r#"[
    {
        "id": "wave",
        "name": "Wave",
        "duration": 1.5,
        "loop": false,
        "interpolation": "easeInOut",
        "category": "special",
        "keyframes": [
            { "time": 0.0, "rotations": { "right_arm": [0, 0, 1] } },
            { "time": 1.0, "rotations": { "right_arm": { "x": 0, "y": 0, "z": 2 } },
              "translations": { "hips": [0, 0.1, 0] } }
        ]
    }
]"#;

#[test]
fn library_loads_json_clips() {
    let library = ActionLibrary::from_json_str(WAVE_JSON).unwrap();
    assert_eq!(library.len(), 1);

    let wave = library.get("wave").unwrap();
    assert!(!wave.looping);
    assert_eq!(wave.interpolation, InterpolationMode::EaseInOut);
    let v = wave.sample(0.5, Bone::RightArm, ChannelKind::Rotation).unwrap();
    assert!(approx(v.z, 1.5));
    let t = wave.sample(1.0, Bone::Hips, ChannelKind::Translation).unwrap();
    assert!(t.abs_diff_eq(Vec3::new(0.0, 0.1, 0.0), EPSILON));
}

#[test]
fn category_tags_survive_serialization() {
    let slash = ActionClip::new("slash", 0.6, Vec::new()).with_category(ActionCategory::Attack);
    let json = serde_json::to_value(&slash).unwrap();
    assert_eq!(json["category"], "attack");

    let library = ActionLibrary::from_clips([
        slash,
        ActionClip::new("stroll", 1.0, Vec::new()).with_category(ActionCategory::Walk),
        ActionClip::new("wave", 1.0, Vec::new()),
    ])
    .unwrap();
    let attacks: Vec<_> = library
        .iter()
        .filter(|clip| clip.category == ActionCategory::Attack)
        .map(|clip| clip.id.as_str())
        .collect();
    assert_eq!(attacks, vec!["slash"]);
    assert_eq!(library.get("wave").unwrap().category, ActionCategory::Special);
}

#[test]
fn library_rejects_unknown_bones() {
    let json = r#"[{ "id": "bad", "duration": 1.0,
        "keyframes": [{ "time": 0.0, "rotations": { "tail": [0, 0, 0] } }] }]"#;
    assert!(ActionLibrary::from_json_str(json).is_err());
}

#[test]
fn library_rejects_empty_id() {
    let result = ActionLibrary::from_clips([ActionClip::new("", 1.0, Vec::new())]);
    assert!(matches!(result, Err(RigError::InvalidAction { .. })));
}

#[test]
fn malformed_vectors_load_as_zero() {
    let json = r#"[{ "id": "odd", "duration": 1.0,
        "keyframes": [{ "time": 0.0, "rotations": { "head": [1, 2] } }] }]"#;
    let library = ActionLibrary::from_json_str(json).unwrap();
    let v = library
        .get("odd")
        .unwrap()
        .sample(0.0, Bone::Head, ChannelKind::Rotation)
        .unwrap();
    assert_eq!(v, Vec3::ZERO);
}

#[test]
fn validation_cleans_times_and_duration() {
    let mut clip = ActionClip::new(
        "messy",
        -1.0,
        vec![Keyframe::new(1.5).with_rotation(Bone::Head, x(1.0))],
    );
    clip.validate().unwrap();
    assert!(approx(clip.duration, 0.0));
    assert!(approx(clip.keyframes[0].time, 1.0));
}

#[test]
fn resolve_skips_missing_links() {
    let library = ActionLibrary::from_json_str(WAVE_JSON).unwrap();
    assert!(library.resolve(Some("wave")).is_some());
    assert!(library.resolve(Some("missing")).is_none());
    assert!(library.resolve(None).is_none());
}
