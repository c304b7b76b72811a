//! Skeleton hierarchy, animation clips and the baked frame table
//!
//! A [`Skeleton`] is built once per animated model and is read-only
//! afterwards. It owns:
//!
//! - the bones, sorted so that every parent precedes its children, with their
//!   bind pose matrices and inverses;
//! - the animation clips, each a contiguous range of rows in the frame table;
//! - the frame table itself: one [`Transform`] per bone per baked frame,
//!   stored row by row.

use std::collections::HashSet;

use crate::coordinate::RootCorrection;
use crate::error::{Result, SkeletonError};
use crate::import::ImportData;
use crate::pose::Pose;
use crate::transform::Transform;
use glam::Mat4;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Bone count supported by the stock skinning shader's matrix array
pub const MAX_SKINNING_BONES: usize = 32;

/// A node of the bone hierarchy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Bone {
    pub name: String,
    /// Parent bone index, `None` for roots
    pub parent: Option<usize>,
    /// Rest transform in model space
    pub base_pose: Mat4,
    /// Inverse of `base_pose`
    pub base_pose_inverse: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<usize>, base_pose: Mat4) -> Self {
        Self {
            name: name.into(),
            parent,
            base_pose,
            base_pose_inverse: base_pose.inverse(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A clip: a contiguous run of rows in the frame table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Animation {
    pub name: String,
    pub first_frame: usize,
    pub num_frames: usize,
    /// Frames per second
    pub framerate: f32,
    pub looping: bool,
}

impl Animation {
    /// Clip length in seconds
    pub fn duration(&self) -> f32 {
        if self.framerate > 0.0 {
            self.num_frames as f32 / self.framerate
        } else {
            0.0
        }
    }

    /// One past the last row of the clip, `None` if the range overflows
    pub fn end_frame(&self) -> Option<usize> {
        self.first_frame.checked_add(self.num_frames)
    }

    /// Frame offset within the clip for a playback time in seconds
    ///
    /// The time is quantized with `floor(time * framerate)`. Looping clips
    /// wrap around (negative times wrap from the end); other clips clamp to
    /// their first and last frame. A clip without frames always yields 0.
    pub fn frame_at(&self, time: f32) -> usize {
        if self.num_frames == 0 {
            return 0;
        }

        let raw = (time * self.framerate).floor();
        let last = self.num_frames as i64 - 1;
        let raw = if raw.is_finite() { raw as i64 } else { 0 };

        if self.looping {
            raw.rem_euclid(self.num_frames as i64) as usize
        } else {
            raw.clamp(0, last) as usize
        }
    }
}

/// Options controlling [`Skeleton::load`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Rotation applied to root bone frames
    pub root_correction: RootCorrection,
    /// Reject skeletons with more bones than this
    pub max_bones: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            root_correction: RootCorrection::None,
            max_bones: Some(MAX_SKINNING_BONES),
        }
    }
}

impl LoadOptions {
    pub fn with_root_correction(mut self, correction: RootCorrection) -> Self {
        self.root_correction = correction;
        self
    }

    pub fn with_max_bones(mut self, max_bones: Option<usize>) -> Self {
        self.max_bones = max_bones;
        self
    }
}

/// Bone hierarchy plus baked animation frames
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    frames: Vec<Transform>,
    animations: Vec<Animation>,
}

impl Skeleton {
    /// Assemble a skeleton from parts, validating every invariant
    ///
    /// - each parent index precedes its child;
    /// - the frame table is a whole number of bone rows;
    /// - every clip with frames fits in the table (when the table is not
    ///   empty) and has a positive, finite framerate;
    /// - the bone count respects `max_bones`.
    pub fn new(
        bones: Vec<Bone>,
        animations: Vec<Animation>,
        frames: Vec<Transform>,
        max_bones: Option<usize>,
    ) -> Result<Self> {
        if let Some(max) = max_bones
            && bones.len() > max
        {
            return Err(SkeletonError::TooManyBones {
                count: bones.len(),
                max,
            });
        }

        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent
                && parent >= index
            {
                return Err(SkeletonError::InvalidParent {
                    bone: index,
                    parent,
                });
            }
        }

        let frame_count = if bones.is_empty() {
            if !frames.is_empty() {
                return Err(SkeletonError::FrameTableMismatch {
                    bones: 0,
                    frames: frames.len(),
                });
            }
            0
        } else {
            if frames.len() % bones.len() != 0 {
                return Err(SkeletonError::FrameTableMismatch {
                    bones: bones.len(),
                    frames: frames.len(),
                });
            }
            frames.len() / bones.len()
        };

        for anim in &animations {
            if anim.num_frames == 0 {
                continue;
            }
            if !(anim.framerate.is_finite() && anim.framerate > 0.0) {
                return Err(SkeletonError::InvalidFramerate {
                    name: anim.name.clone(),
                    framerate: anim.framerate,
                });
            }
            if frame_count > 0 && anim.end_frame().is_none_or(|end| end > frame_count) {
                return Err(SkeletonError::AnimationRange {
                    name: anim.name.clone(),
                    first_frame: anim.first_frame,
                    num_frames: anim.num_frames,
                    frame_count,
                });
            }
        }

        warn_duplicate_names("animation", animations.iter().map(|a| a.name.as_str()));
        warn_duplicate_names("bone", bones.iter().map(|b| b.name.as_str()));

        Ok(Self {
            bones,
            frames,
            animations,
        })
    }

    /// Build a skeleton from loader output
    pub fn load(data: &ImportData, options: &LoadOptions) -> Result<Self> {
        let bones = build_bones(data)?;

        let animations: Vec<Animation> = data
            .animations
            .iter()
            .map(|anim| Animation {
                name: anim.name.clone(),
                first_frame: anim.first_frame,
                num_frames: anim.num_frames,
                framerate: anim.framerate,
                looping: anim.looping,
            })
            .collect();

        for anim in &animations {
            log::trace!(
                "Animation '{}': frames {}..{} at {} fps{}",
                anim.name,
                anim.first_frame,
                anim.first_frame.saturating_add(anim.num_frames),
                anim.framerate,
                if anim.looping { ", looping" } else { "" }
            );
        }

        let frames = decode_frames(data, &bones, &options.root_correction)?;

        let skeleton = Self::new(bones, animations, frames, options.max_bones)?;

        log::debug!(
            "Loaded skeleton: {} bones, {} animations, {} frames",
            skeleton.bone_count(),
            skeleton.animations.len(),
            skeleton.frame_count()
        );

        Ok(skeleton)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    /// The whole frame table, row after row
    pub fn frame_transforms(&self) -> &[Transform] {
        &self.frames
    }

    /// Number of baked frames (rows) in the frame table
    pub fn frame_count(&self) -> usize {
        if self.bones.is_empty() {
            0
        } else {
            self.frames.len() / self.bones.len()
        }
    }

    /// Check whether the skeleton can only be shown in its bind pose
    pub fn is_bind_only(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the first animation called `name`
    pub fn animation_index(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|anim| anim.name == name)
    }

    /// Index of the first bone called `name`
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// Indices of the direct children of `bone`
    pub fn children(&self, bone: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.parent == Some(bone))
            .map(|(index, _)| index)
    }

    /// One full row of the frame table
    pub fn frame_row(&self, row: usize) -> Option<&[Transform]> {
        let width = self.bones.len();
        let start = row.checked_mul(width)?;
        self.frames.get(start..start.checked_add(width)?)
    }

    /// The bone transforms of `animation` at playback time `time`
    ///
    /// See [`Animation::frame_at`] for the loop and clamp rules.
    pub fn frame(&self, animation: &Animation, time: f32) -> Result<&[Transform]> {
        let offset = animation.frame_at(time);
        let frame_count = self.frame_count();
        let out_of_range = |row| SkeletonError::FrameOutOfRange {
            animation: animation.name.clone(),
            row,
            frame_count,
        };

        let row = animation
            .first_frame
            .checked_add(offset)
            .ok_or_else(|| out_of_range(usize::MAX))?;
        if animation.num_frames == 0 || row >= frame_count {
            return Err(out_of_range(row));
        }

        self.frame_row(row).ok_or_else(|| out_of_range(row))
    }

    /// Like [`Skeleton::frame`], looking the animation up by index
    pub fn frame_by_index(&self, index: usize, time: f32) -> Result<&[Transform]> {
        let animation = self.animation_or_err(index)?;
        self.frame(animation, time)
    }

    /// Sample a pose, see [`Pose::sample`]
    pub fn pose(&self, animation: Option<usize>, time: f32, smooth: bool) -> Result<Pose<'_>> {
        Pose::sample(self, animation, time, smooth)
    }

    pub(crate) fn animation_or_err(&self, index: usize) -> Result<&Animation> {
        self.animations
            .get(index)
            .ok_or(SkeletonError::AnimationIndexOutOfRange {
                index,
                count: self.animations.len(),
            })
    }
}

/// Build a skeleton with default [`LoadOptions`]
pub fn load_skeleton(data: &ImportData) -> Result<Skeleton> {
    Skeleton::load(data, &LoadOptions::default())
}

/// Compose bind poses joint by joint, parents first
fn build_bones(data: &ImportData) -> Result<Vec<Bone>> {
    let mut bones: Vec<Bone> = Vec::with_capacity(data.joints.len());

    for (index, joint) in data.joints.iter().enumerate() {
        let mut matrix = joint.local_transform().to_matrix();

        if let Some(parent) = joint.parent {
            let parent_bone = bones
                .get(parent)
                .ok_or(SkeletonError::InvalidParent {
                    bone: index,
                    parent,
                })?;
            matrix = parent_bone.base_pose * matrix;
        }

        bones.push(Bone::new(joint.name.clone(), joint.parent, matrix));
    }

    Ok(bones)
}

/// Unpack the channel stream into the frame table
fn decode_frames(
    data: &ImportData,
    bones: &[Bone],
    correction: &RootCorrection,
) -> Result<Vec<Transform>> {
    if data.frames.is_empty() || data.num_frame_channels == 0 {
        if !data.frames.is_empty() {
            log::warn!(
                "Ignoring {} frame values: no channels per frame declared",
                data.frames.len()
            );
        } else if !data.animations.is_empty() {
            log::debug!("No baked frames, skeleton is bind pose only");
        }
        return Ok(Vec::new());
    }

    if data.poses.len() != data.joints.len() {
        return Err(SkeletonError::PoseCountMismatch {
            joints: data.joints.len(),
            poses: data.poses.len(),
        });
    }

    let active = data.active_channel_count();
    if active != data.num_frame_channels {
        return Err(SkeletonError::ChannelCountMismatch {
            active,
            declared: data.num_frame_channels,
        });
    }

    if data.frames.len() % data.num_frame_channels != 0 {
        return Err(SkeletonError::TruncatedFrameStream {
            len: data.frames.len(),
            channels: data.num_frame_channels,
        });
    }

    let frame_count = data.frame_count();
    let mut transforms = Vec::with_capacity(frame_count * bones.len());
    let mut stream = data.frames.iter().copied();

    for _ in 0..frame_count {
        for (pose, bone) in data.poses.iter().zip(bones) {
            let transform = pose
                .decode(&mut stream)
                .ok_or(SkeletonError::TruncatedFrameStream {
                    len: data.frames.len(),
                    channels: data.num_frame_channels,
                })?;

            let transform = if bone.is_root() {
                correction.apply(transform)
            } else {
                transform
            };
            transforms.push(transform);
        }
    }

    Ok(transforms)
}

fn warn_duplicate_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            log::warn!("Duplicate {kind} name '{name}': lookups return the first match");
        }
    }
}
