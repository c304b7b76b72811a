//! Skeletal animation core for skinned meshes
//!
//! This crate turns imported skeleton data (bind poses, bone hierarchy and
//! baked animation channels) into per-bone matrices at any playback time:
//!
//! - [`Skeleton`] holds the hierarchy, the clips and the baked frame table;
//! - [`Pose`] is a cheap, borrowed snapshot (bind pose, one frame, or two
//!   blended frames) that resolves into bone matrices;
//! - [`AnimationPlayer`] tracks the running clip and playback time.
//!
//! # Example
//!
//! ```rust
//! use bonework_skeleton::{
//!     load_skeleton, ImportAnimation, ImportData, ImportJoint, Pose, Transform,
//! };
//! use glam::{Mat4, Quat, Vec3};
//!
//! let joints = vec![
//!     ImportJoint::new("root", None),
//!     ImportJoint::new("arm", Some(0)).with_translation(Vec3::Y),
//! ];
//! let frames = vec![
//!     vec![Transform::IDENTITY, Transform::from_translation(Vec3::Y)],
//!     vec![
//!         Transform::IDENTITY,
//!         Transform::new(Vec3::Y, Quat::from_rotation_z(1.0), Vec3::ONE),
//!     ],
//! ];
//! let animations = vec![ImportAnimation::new("Wave", 0, 2, 1.0, true)];
//!
//! let data = ImportData::bake(joints, animations, &frames)?;
//! let skeleton = load_skeleton(&data)?;
//!
//! let wave = skeleton.animation_index("Wave");
//! let pose = Pose::sample(&skeleton, wave, 0.25, true)?;
//!
//! let mut uniforms = [Mat4::IDENTITY; 32];
//! let written = pose.write_bone_matrices(&mut uniforms);
//! assert_eq!(written, 2);
//!
//! let arm = skeleton.bone_index("arm").and_then(|bone| pose.bone_world_matrix(bone));
//! assert!(arm.is_some());
//! # Ok::<(), bonework_skeleton::SkeletonError>(())
//! ```

pub mod coordinate;
pub mod error;
pub mod import;
pub mod player;
pub mod pose;
pub mod skeleton;
pub mod transform;

pub use glam;

pub use coordinate::RootCorrection;
pub use error::{Result, SkeletonError};
pub use import::{
    CHANNELS_PER_BONE, ChannelMask, ImportAnimation, ImportData, ImportJoint, ImportPose,
};
pub use player::AnimationPlayer;
pub use pose::{Pose, PoseData};
pub use skeleton::{
    Animation, Bone, LoadOptions, MAX_SKINNING_BONES, Skeleton, load_skeleton,
};
pub use transform::{Mix, Transform, mix, to_matrix};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
