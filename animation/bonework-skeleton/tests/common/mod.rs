//! Shared fixtures for the integration tests

#![allow(dead_code)]

use bonework_skeleton::{
    ImportAnimation, ImportData, ImportJoint, Skeleton, Transform, load_skeleton,
};
use glam::{Mat4, Quat, Vec3};

pub const EPSILON: f32 = 1e-4;

pub fn assert_mat_eq(actual: Mat4, expected: Mat4) {
    assert!(
        actual.abs_diff_eq(expected, EPSILON),
        "matrices differ:\n  actual   {actual:?}\n  expected {expected:?}"
    );
}

/// Root at the origin, child one unit up, "Walk" bends the child 90° about Z
pub fn walk_skeleton() -> Skeleton {
    let joints = vec![
        ImportJoint::new("root", None),
        ImportJoint::new("child", Some(0)).with_translation(Vec3::Y),
    ];
    let frames = vec![
        vec![Transform::IDENTITY, Transform::IDENTITY],
        vec![
            Transform::IDENTITY,
            Transform::from_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        ],
    ];
    let animations = vec![ImportAnimation::new("Walk", 0, 2, 1.0, false)];

    let data = ImportData::bake(joints, animations, &frames).expect("bake walk fixture");
    load_skeleton(&data).expect("load walk fixture")
}

/// A branching hierarchy with non-trivial rest transforms and two clips
pub fn branching_skeleton() -> Skeleton {
    let joints = vec![
        ImportJoint::new("pelvis", None).with_translation(Vec3::new(0.0, 1.0, 0.0)),
        ImportJoint::new("spine", Some(0))
            .with_translation(Vec3::new(0.0, 0.5, 0.0))
            .with_rotation(Quat::from_rotation_x(0.1)),
        ImportJoint::new("head", Some(1)).with_translation(Vec3::new(0.0, 0.6, 0.1)),
        ImportJoint::new("thigh.l", Some(0))
            .with_translation(Vec3::new(0.2, -0.1, 0.0))
            .with_rotation(Quat::from_rotation_z(0.2)),
        ImportJoint::new("shin.l", Some(3))
            .with_translation(Vec3::new(0.0, -0.5, 0.0))
            .with_scale(Vec3::new(1.0, 1.2, 1.0)),
    ];

    let rest: Vec<Transform> = joints.iter().map(ImportJoint::local_transform).collect();
    let frames: Vec<Vec<Transform>> = (0..6)
        .map(|frame| {
            let phase = frame as f32 * 0.4;
            rest.iter()
                .enumerate()
                .map(|(bone, t)| Transform {
                    translation: t.translation + Vec3::new(0.0, 0.02 * phase.sin(), 0.0),
                    rotation: t.rotation * Quat::from_rotation_x(phase * (bone as f32 + 1.0) * 0.1),
                    scale: t.scale,
                })
                .collect()
        })
        .collect();

    let animations = vec![
        ImportAnimation::new("Idle", 0, 2, 8.0, true),
        ImportAnimation::new("Run", 2, 4, 12.0, true),
    ];

    let data = ImportData::bake(joints, animations, &frames).expect("bake branching fixture");
    load_skeleton(&data).expect("load branching fixture")
}
