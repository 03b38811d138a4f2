use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Vec2, Vec3};
use std::hint::black_box;

use rigmotion::{
    ActionClip, ActionLibrary, AnimatorState, Bone, FrameInputs, Keyframe, LocomotionConfigs,
    LocomotionState, Skeleton, compute_pose,
};

fn walk_clip() -> ActionClip {
    let keyframes = (0..=8)
        .map(|i| {
            let t = i as f32 / 8.0;
            let s = (t * std::f32::consts::TAU).sin();
            Keyframe::new(t)
                .with_rotation(Bone::LeftThigh, Vec3::new(s, 0.0, 0.0))
                .with_rotation(Bone::RightThigh, Vec3::new(-s, 0.0, 0.0))
                .with_rotation(Bone::LeftArm, Vec3::new(-0.5 * s, 0.0, -1.1))
                .with_rotation(Bone::RightArm, Vec3::new(0.5 * s, 0.0, 1.1))
                .with_translation(Bone::Hips, Vec3::new(0.0, 0.05 * s.abs(), 0.0))
        })
        .collect();
    ActionClip::new("walk_cycle", 1.0, keyframes)
}

fn compose_benchmark(c: &mut Criterion) {
    let skeleton = Skeleton::humanoid();
    let procedural = LocomotionConfigs::default();
    let empty = ActionLibrary::new();

    c.bench_function("compose_procedural_walk", |b| {
        let mut state = AnimatorState::new();
        let inputs = FrameInputs::new(&procedural, &empty)
            .with_state(LocomotionState::Walk)
            .with_movement(Vec2::new(0.0, 1.0), true);
        b.iter(|| {
            state.clock.advance(1.0 / 60.0);
            black_box(compute_pose(&mut state, &skeleton, black_box(&inputs)));
        });
    });

    let library = ActionLibrary::from_clips([walk_clip()]).unwrap();
    let linked =
        LocomotionConfigs::from_json_str(r#"{ "walk": { "linkedAction": "walk_cycle" } }"#)
            .unwrap();

    c.bench_function("compose_linked_walk_with_attack", |b| {
        let mut state = AnimatorState::new();
        let inputs = FrameInputs::new(&linked, &library)
            .with_state(LocomotionState::Attack)
            .with_movement(Vec2::new(0.3, 1.0), true)
            .with_last_attack_time(Some(1.0));
        b.iter(|| {
            state.clock.advance(1.0 / 60.0);
            black_box(compute_pose(&mut state, &skeleton, black_box(&inputs)));
        });
    });
}

criterion_group!(benches, compose_benchmark);
criterion_main!(benches);
