//! Integration tests for pose sampling and bone matrix resolution

mod common;

use bonework_skeleton::{
    Bone, ImportData, ImportJoint, Pose, PoseData, Skeleton, Transform, load_skeleton,
};
use common::{assert_mat_eq, branching_skeleton, walk_skeleton};
use glam::{Mat4, Quat, Vec3};
use rstest::rstest;
use std::f32::consts::FRAC_PI_4;

#[test]
fn test_walk_scenario_blends_halfway() {
    let skeleton = walk_skeleton();
    let walk = skeleton.animation_index("Walk");
    assert_eq!(walk, Some(0));

    let pose = Pose::sample(&skeleton, walk, 0.5, true).unwrap();
    let PoseData::Blended { alpha, .. } = *pose.data() else {
        panic!("smooth sampling must blend");
    };
    assert!((alpha - 0.5).abs() < 1e-6);

    // Root stays at rest; the child turns 45° about Z around the root,
    // then its own bind offset is removed.
    let matrices = pose.bone_matrices();
    assert_mat_eq(matrices[0], Mat4::IDENTITY);

    let expected_child = Mat4::from_rotation_z(FRAC_PI_4) * Mat4::from_translation(-Vec3::Y);
    assert_mat_eq(matrices[1], expected_child);

    let local = pose.local_transform(1).unwrap();
    assert!(
        local
            .rotation
            .abs_diff_eq(Quat::from_rotation_z(FRAC_PI_4), 1e-4)
    );
}

#[test]
fn test_bind_pose_resolves_to_base_pose() {
    let skeleton = branching_skeleton();
    let pose = Pose::sample(&skeleton, None, 12.0, true).unwrap();

    let bulk = pose.bone_matrices();
    for (i, bone) in skeleton.bones().iter().enumerate() {
        assert_eq!(bulk[i], bone.base_pose);
        assert_eq!(pose.bone_world_matrix(i), Some(bone.base_pose));
        assert_eq!(pose.bone_attachment_matrix(i), Some(bone.base_pose));
    }
}

#[test]
fn test_identity_chain_is_self_consistent() {
    let data = ImportData::from_joints(vec![
        ImportJoint::new("root", None),
        ImportJoint::new("child", Some(0)),
        ImportJoint::new("grandchild", Some(1)),
    ]);
    let skeleton = load_skeleton(&data).unwrap();

    let pose = Pose::bind(&skeleton);
    for (i, bone) in skeleton.bones().iter().enumerate() {
        assert_eq!(bone.base_pose, Mat4::IDENTITY);
        let resolved = pose.bone_world_matrix(i).unwrap();
        assert_mat_eq(resolved * bone.base_pose_inverse, Mat4::IDENTITY);
    }
}

#[test]
fn test_root_only_skeleton_has_no_parent_term() {
    let bones = vec![
        Bone::new("a", None, Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))),
        Bone::new("b", None, Mat4::from_rotation_y(0.7)),
    ];
    let frame = vec![
        Transform::new(Vec3::X, Quat::from_rotation_z(0.3), Vec3::splat(2.0)),
        Transform::from_translation(Vec3::new(0.0, -1.0, 4.0)),
    ];
    let skeleton = Skeleton::new(bones, vec![], frame.clone(), None).unwrap();

    let row = skeleton.frame_row(0).unwrap();
    let pose = Pose::single(&skeleton, row).unwrap();
    let matrices = pose.bone_matrices();

    for (i, bone) in skeleton.bones().iter().enumerate() {
        assert_eq!(matrices[i], frame[i].to_matrix() * bone.base_pose_inverse);
    }
}

#[rstest]
#[case::idle_frame(Some(0), 0.0, false)]
#[case::idle_blend(Some(0), 0.07, true)]
#[case::run_frame(Some(1), 0.2, false)]
#[case::run_blend(Some(1), 0.29, true)]
#[case::run_wrapped_blend(Some(1), 3.31, true)]
#[case::bind(None, 1.0, true)]
fn test_bulk_matches_single_bone(
    #[case] animation: Option<usize>,
    #[case] time: f32,
    #[case] smooth: bool,
) {
    let skeleton = branching_skeleton();
    let pose = Pose::sample(&skeleton, animation, time, smooth).unwrap();

    let bulk = pose.bone_matrices();
    let mut written = vec![Mat4::ZERO; skeleton.bone_count()];
    assert_eq!(pose.write_bone_matrices(&mut written), skeleton.bone_count());

    for i in 0..skeleton.bone_count() {
        let single = pose.bone_world_matrix(i).unwrap();
        assert_mat_eq(bulk[i], single);
        assert_mat_eq(written[i], single);
    }
}

#[test]
fn test_blended_pose_sits_between_frames() {
    let skeleton = branching_skeleton();
    let run = skeleton.animation(skeleton.animation_index("Run").unwrap()).unwrap();

    let from = skeleton.frame_row(run.first_frame).unwrap();
    let to = skeleton.frame_row(run.first_frame + 1).unwrap();

    let start = Pose::blended(&skeleton, from, to, 0.0).unwrap();
    let end = Pose::blended(&skeleton, from, to, 1.0).unwrap();
    let first = Pose::single(&skeleton, from).unwrap();
    let second = Pose::single(&skeleton, to).unwrap();

    assert_eq!(start.bone_matrices(), first.bone_matrices());
    assert_eq!(end.bone_matrices(), second.bone_matrices());
}

#[test]
fn test_alpha_is_clamped() {
    let skeleton = walk_skeleton();
    let from = skeleton.frame_row(0).unwrap();
    let to = skeleton.frame_row(1).unwrap();

    let pose = Pose::blended(&skeleton, from, to, 1.7).unwrap();
    let PoseData::Blended { alpha, .. } = *pose.data() else {
        panic!("expected blended pose");
    };
    assert_eq!(alpha, 1.0);
}

#[test]
fn test_rest_frame_gives_identity_skinning() {
    // The "Idle" clip starts at the rest pose with zero phase offset
    let skeleton = branching_skeleton();
    let pose = Pose::sample(&skeleton, Some(0), 0.0, false).unwrap();

    for m in pose.bone_matrices() {
        assert_mat_eq(m, Mat4::IDENTITY);
    }
}

#[test]
fn test_attachment_matrix_tracks_animation() {
    let skeleton = walk_skeleton();
    let child = skeleton.bone_index("child").unwrap();

    let pose = Pose::sample(&skeleton, Some(0), 1.0, false).unwrap();
    let attach = pose.bone_attachment_matrix(child).unwrap();

    // Frame 1 keeps the child at the origin but turned 90° about Z
    let x_axis = attach.transform_vector3(Vec3::X);
    assert!(x_axis.abs_diff_eq(Vec3::Y, 1e-4));
    assert!(
        attach
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::ZERO, 1e-4)
    );
}

#[test]
fn test_gpu_data_matches_bone_matrices() {
    let skeleton = branching_skeleton();
    let pose = Pose::sample(&skeleton, Some(1), 0.1, true).unwrap();

    let data = pose.gpu_data();
    let matrices = pose.bone_matrices();
    assert_eq!(data.len(), matrices.len() * 16);

    for (chunk, m) in data.chunks_exact(16).zip(&matrices) {
        assert_eq!(chunk, &m.to_cols_array());
    }
}

#[test]
fn test_poses_are_shared_across_threads() {
    let skeleton = branching_skeleton();

    let results: Vec<Vec<Mat4>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let skeleton = &skeleton;
                scope.spawn(move || {
                    Pose::sample(skeleton, Some(1), i as f32 * 0.05, true)
                        .unwrap()
                        .bone_matrices()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, matrices) in results.iter().enumerate() {
        let expected = Pose::sample(&skeleton, Some(1), i as f32 * 0.05, true)
            .unwrap()
            .bone_matrices();
        assert_eq!(matrices, &expected);
    }
}
