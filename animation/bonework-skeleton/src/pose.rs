//! Resolved skeleton poses
//!
//! A [`Pose`] describes where every bone of a [`Skeleton`] is at one moment:
//! either its bind pose, a single baked frame, or a blend of two frames. It
//! borrows the frame rows from the skeleton, so it costs nothing to build and
//! is meant to be created fresh for every draw or query.
//!
//! Resolution turns the pose into one matrix per bone. For animated poses the
//! matrix of bone `i` with local transform `t` is
//!
//! ```text
//! root:  M(t) * inverse(bind[i])
//! child: resolved[parent] * bind[parent] * M(t) * inverse(bind[i])
//! ```
//!
//! so a bone sitting at its rest transform resolves to the identity, which is
//! what a skinning shader expects. Bind poses resolve to `bind[i]` itself.
//!
//! Two strategies are offered and always agree:
//!
//! - [`Pose::bone_matrices`] / [`Pose::write_bone_matrices`] walk all bones in
//!   index order, reusing each parent's result (bulk upload);
//! - [`Pose::bone_world_matrix`] walks a single bone's parent chain
//!   (attachment points, IK targets).

use crate::error::{Result, SkeletonError};
use crate::skeleton::Skeleton;
use crate::transform::Transform;
use glam::Mat4;

/// How a pose obtains the local transform of each bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseData<'a> {
    /// No animation, every bone in its bind pose
    Bind,
    /// One frame row of the skeleton
    Single(&'a [Transform]),
    /// Two frame rows blended with `alpha` in `[0, 1]`
    Blended {
        from: &'a [Transform],
        to: &'a [Transform],
        alpha: f32,
    },
}

/// Snapshot of a skeleton's bones at one point in time
#[derive(Debug, Clone, Copy)]
pub struct Pose<'a> {
    skeleton: &'a Skeleton,
    data: PoseData<'a>,
}

impl<'a> Pose<'a> {
    /// Every bone in its bind pose
    pub fn bind(skeleton: &'a Skeleton) -> Self {
        Self {
            skeleton,
            data: PoseData::Bind,
        }
    }

    /// A pose taken from one frame row
    pub fn single(skeleton: &'a Skeleton, frame: &'a [Transform]) -> Result<Self> {
        check_row(skeleton, frame)?;
        Ok(Self {
            skeleton,
            data: PoseData::Single(frame),
        })
    }

    /// A blend of two frame rows, `alpha` is clamped to `[0, 1]` and NaN
    /// counts as 0
    pub fn blended(
        skeleton: &'a Skeleton,
        from: &'a [Transform],
        to: &'a [Transform],
        alpha: f32,
    ) -> Result<Self> {
        check_row(skeleton, from)?;
        check_row(skeleton, to)?;
        Ok(Self {
            skeleton,
            data: PoseData::Blended {
                from,
                to,
                alpha: if alpha.is_nan() {
                    0.0
                } else {
                    alpha.clamp(0.0, 1.0)
                },
            },
        })
    }

    /// Sample an animation at a playback time
    ///
    /// - without an animation the pose is [`PoseData::Bind`];
    /// - otherwise the frame at `time` is looked up; with `smooth` the next
    ///   sample point (`time + 1 / framerate`) is fetched as well and the two
    ///   are blended by the fractional part of `time * framerate`.
    ///
    /// # Errors
    ///
    /// `AnimationIndexOutOfRange` if `animation` is not a valid index, and
    /// `FrameOutOfRange` if the clip has no frames in the table.
    pub fn sample(
        skeleton: &'a Skeleton,
        animation: Option<usize>,
        time: f32,
        smooth: bool,
    ) -> Result<Self> {
        let Some(index) = animation else {
            return Ok(Self::bind(skeleton));
        };

        let anim = skeleton.animation_or_err(index)?;
        let prev = skeleton.frame(anim, time)?;

        if !smooth {
            return Self::single(skeleton, prev);
        }

        let next = skeleton.frame(anim, time + 1.0 / anim.framerate)?;
        let scaled = time * anim.framerate;
        let alpha = scaled - scaled.floor();

        Self::blended(skeleton, prev, next, alpha)
    }

    pub fn skeleton(&self) -> &'a Skeleton {
        self.skeleton
    }

    pub fn data(&self) -> &PoseData<'a> {
        &self.data
    }

    pub fn is_bind(&self) -> bool {
        matches!(self.data, PoseData::Bind)
    }

    pub fn bone_count(&self) -> usize {
        self.skeleton.bone_count()
    }

    /// Animated local transform of a bone, `None` for bind poses
    /// and out-of-range bones
    pub fn local_transform(&self, bone: usize) -> Option<Transform> {
        match self.data {
            PoseData::Bind => None,
            PoseData::Single(frame) => frame.get(bone).copied(),
            PoseData::Blended { from, to, alpha } => {
                Some(from.get(bone)?.mix(to.get(bone)?, alpha))
            }
        }
    }

    /// Resolve bone `i` given its parent's resolved matrix
    ///
    /// Callers guarantee `i` is in range and that `parent_resolved` is the
    /// resolution of the bone's parent.
    fn compose(&self, i: usize, parent_resolved: Option<Mat4>) -> Mat4 {
        let bones = self.skeleton.bones();
        let bone = &bones[i];

        let Some(local) = self.local_transform(i) else {
            return bone.base_pose;
        };
        let local = local.to_matrix();

        match (bone.parent, parent_resolved) {
            (Some(parent), Some(parent_resolved)) => {
                parent_resolved * bones[parent].base_pose * local * bone.base_pose_inverse
            }
            _ => local * bone.base_pose_inverse,
        }
    }

    /// Resolve every bone, parents before children
    pub fn bone_matrices(&self) -> Vec<Mat4> {
        let bones = self.skeleton.bones();
        let mut resolved: Vec<Mat4> = Vec::with_capacity(bones.len());

        for (i, bone) in bones.iter().enumerate() {
            let parent = bone.parent.and_then(|p| resolved.get(p).copied());
            let matrix = self.compose(i, parent);
            resolved.push(matrix);
        }

        resolved
    }

    /// Fill `out` with resolved bone matrices for upload
    ///
    /// Writes `min(bone_count, out.len())` matrices and returns that count.
    /// Skeletons are limited to the upload size at load time through
    /// [`LoadOptions::max_bones`](crate::LoadOptions::max_bones).
    pub fn write_bone_matrices(&self, out: &mut [Mat4]) -> usize {
        let count = self.bone_count().min(out.len());
        if count < self.bone_count() {
            log::debug!(
                "Bone matrix buffer holds {} of {} bones",
                out.len(),
                self.bone_count()
            );
        }

        let bones = self.skeleton.bones();
        for i in 0..count {
            let parent = bones[i].parent.map(|p| out[p]);
            out[i] = self.compose(i, parent);
        }

        count
    }

    /// Resolved bone matrices as a flat column-major `f32` array
    pub fn gpu_data(&self) -> Vec<f32> {
        self.bone_matrices()
            .iter()
            .flat_map(Mat4::to_cols_array)
            .collect()
    }

    /// Resolve a single bone by walking its parent chain
    pub fn bone_world_matrix(&self, bone: usize) -> Option<Mat4> {
        let bones = self.skeleton.bones();
        bones.get(bone)?;

        let mut chain = vec![bone];
        let mut current = bone;
        while let Some(parent) = bones[current].parent {
            chain.push(parent);
            current = parent;
        }

        let mut resolved = None;
        for &i in chain.iter().rev() {
            resolved = Some(self.compose(i, resolved));
        }
        resolved
    }

    /// Model-space transform of a bone, for attaching objects to it
    ///
    /// This is the resolved matrix carried back through the bone's bind pose.
    /// Bind poses yield the bind pose unchanged.
    pub fn bone_attachment_matrix(&self, bone: usize) -> Option<Mat4> {
        let bind = self.skeleton.bone(bone)?.base_pose;
        if self.is_bind() {
            return Some(bind);
        }
        Some(self.bone_world_matrix(bone)? * bind)
    }
}

fn check_row(skeleton: &Skeleton, row: &[Transform]) -> Result<()> {
    if row.len() == skeleton.bone_count() {
        Ok(())
    } else {
        Err(SkeletonError::PoseLengthMismatch {
            expected: skeleton.bone_count(),
            actual: row.len(),
        })
    }
}
