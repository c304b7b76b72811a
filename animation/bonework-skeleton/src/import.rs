//! Neutral animation import data
//!
//! File loaders translate their format into [`ImportData`] and hand it to
//! [`Skeleton::load`](crate::Skeleton::load). The layout follows the usual
//! baked-channel scheme:
//!
//! - one [`ImportJoint`] per bone, in parent-before-child order;
//! - one [`ImportPose`] per bone describing its ten animation channels
//!   (translation xyz, rotation xyzw, scale xyz);
//! - a packed stream of quantized `u16` values holding, frame after frame and
//!   bone after bone, only the channels whose bit is set in the bone's
//!   [`ChannelMask`].
//!
//! A channel value decodes as `channel_offset + raw * channel_scale`. Channels
//! that are not stored decode to `channel_offset` on every frame.

use crate::error::{Result, SkeletonError};
use crate::transform::Transform;
use bitflags::bitflags;
use glam::{Quat, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Number of animation channels per bone
pub const CHANNELS_PER_BONE: usize = 10;

bitflags! {
    /// Set of channels stored in the packed frame stream for one bone
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct ChannelMask: u32 {
        const TRANSLATION_X = 1 << 0;
        const TRANSLATION_Y = 1 << 1;
        const TRANSLATION_Z = 1 << 2;
        const ROTATION_X = 1 << 3;
        const ROTATION_Y = 1 << 4;
        const ROTATION_Z = 1 << 5;
        const ROTATION_W = 1 << 6;
        const SCALE_X = 1 << 7;
        const SCALE_Y = 1 << 8;
        const SCALE_Z = 1 << 9;

        const TRANSLATION = Self::TRANSLATION_X.bits()
            | Self::TRANSLATION_Y.bits()
            | Self::TRANSLATION_Z.bits();
        const ROTATION = Self::ROTATION_X.bits()
            | Self::ROTATION_Y.bits()
            | Self::ROTATION_Z.bits()
            | Self::ROTATION_W.bits();
        const SCALE = Self::SCALE_X.bits() | Self::SCALE_Y.bits() | Self::SCALE_Z.bits();
    }
}

impl ChannelMask {
    /// Mask bit for the channel at `index` (0..10)
    pub fn channel(index: usize) -> Self {
        Self::from_bits_truncate(1 << index)
    }

    /// Check whether the channel at `index` is stored in the frame stream
    pub fn is_active(&self, index: usize) -> bool {
        index < CHANNELS_PER_BONE && self.contains(Self::channel(index))
    }

    /// Number of stored channels
    pub fn active_count(&self) -> usize {
        self.bits().count_ones() as usize
    }
}

/// Rest transform and hierarchy link of one joint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportJoint {
    pub name: String,
    /// Index of the parent joint, `None` for roots
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl ImportJoint {
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local rest transform of this joint
    pub fn local_transform(&self) -> Transform {
        Transform::new(self.translation, self.rotation.normalize(), self.scale)
    }
}

/// Channel layout of one joint in the packed frame stream
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportPose {
    pub channel_mask: ChannelMask,
    pub channel_offset: [f32; CHANNELS_PER_BONE],
    pub channel_scale: [f32; CHANNELS_PER_BONE],
}

impl ImportPose {
    /// A pose with no stored channels, always decoding to `transform`
    pub fn constant(transform: &Transform) -> Self {
        Self {
            channel_mask: ChannelMask::empty(),
            channel_offset: channel_values(transform),
            channel_scale: [0.0; CHANNELS_PER_BONE],
        }
    }

    /// Decode one bone's channels, pulling stored values from `stream`
    ///
    /// `stream` must yield exactly one value per active channel.
    pub(crate) fn decode(&self, stream: &mut impl Iterator<Item = u16>) -> Option<Transform> {
        let mut values = self.channel_offset;
        for (channel, value) in values.iter_mut().enumerate() {
            if self.channel_mask.is_active(channel) {
                let raw = stream.next()?;
                *value += f32::from(raw) * self.channel_scale[channel];
            }
        }
        Some(transform_from_channels(&values))
    }
}

/// Metadata of one animation clip
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportAnimation {
    pub name: String,
    pub first_frame: usize,
    pub num_frames: usize,
    /// Frames per second
    pub framerate: f32,
    pub looping: bool,
}

impl ImportAnimation {
    pub fn new(
        name: impl Into<String>,
        first_frame: usize,
        num_frames: usize,
        framerate: f32,
        looping: bool,
    ) -> Self {
        Self {
            name: name.into(),
            first_frame,
            num_frames,
            framerate,
            looping,
        }
    }
}

/// Everything a loader extracts from an animated model for the skeleton
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportData {
    pub joints: Vec<ImportJoint>,
    /// Channel layout, one per joint
    pub poses: Vec<ImportPose>,
    pub animations: Vec<ImportAnimation>,
    /// Packed channel stream, `num_frame_channels` values per frame
    pub frames: Vec<u16>,
    pub num_frame_channels: usize,
}

impl ImportData {
    /// Import data with a hierarchy only, no animation
    pub fn from_joints(joints: Vec<ImportJoint>) -> Self {
        Self {
            joints,
            ..Self::default()
        }
    }

    /// Total of the active channels over every pose
    pub fn active_channel_count(&self) -> usize {
        self.poses
            .iter()
            .map(|pose| pose.channel_mask.active_count())
            .sum()
    }

    /// Number of whole frames in the packed stream
    pub fn frame_count(&self) -> usize {
        if self.num_frame_channels == 0 {
            0
        } else {
            self.frames.len() / self.num_frame_channels
        }
    }

    /// Encode explicit per-frame local transforms into the packed stream
    ///
    /// `frames` holds one row per baked frame, each row one transform per
    /// joint. Channels that never change become constant channels; the others
    /// are quantized to 16 bits over their value range.
    pub fn bake(
        joints: Vec<ImportJoint>,
        animations: Vec<ImportAnimation>,
        frames: &[Vec<Transform>],
    ) -> Result<Self> {
        let bone_count = joints.len();

        for (frame, row) in frames.iter().enumerate() {
            if row.len() != bone_count {
                return Err(SkeletonError::BakeRowLength {
                    frame,
                    expected: bone_count,
                    actual: row.len(),
                });
            }
        }

        if frames.is_empty() {
            let poses = joints
                .iter()
                .map(|joint| ImportPose::constant(&joint.local_transform()))
                .collect();
            return Ok(Self {
                joints,
                poses,
                animations,
                frames: Vec::new(),
                num_frame_channels: 0,
            });
        }

        let mut poses = Vec::with_capacity(bone_count);
        for bone in 0..bone_count {
            let mut min = [f32::INFINITY; CHANNELS_PER_BONE];
            let mut max = [f32::NEG_INFINITY; CHANNELS_PER_BONE];
            for row in frames {
                for (channel, value) in channel_values(&row[bone]).into_iter().enumerate() {
                    min[channel] = min[channel].min(value);
                    max[channel] = max[channel].max(value);
                }
            }

            let mut pose = ImportPose {
                channel_mask: ChannelMask::empty(),
                channel_offset: min,
                channel_scale: [0.0; CHANNELS_PER_BONE],
            };
            for channel in 0..CHANNELS_PER_BONE {
                let range = max[channel] - min[channel];
                if range > 0.0 {
                    pose.channel_mask |= ChannelMask::channel(channel);
                    pose.channel_scale[channel] = range / f32::from(u16::MAX);
                }
            }
            poses.push(pose);
        }

        let num_frame_channels = poses.iter().map(|p| p.channel_mask.active_count()).sum();
        let mut stream = Vec::with_capacity(num_frame_channels * frames.len());
        for row in frames {
            for (pose, transform) in poses.iter().zip(row) {
                let values = channel_values(transform);
                for channel in 0..CHANNELS_PER_BONE {
                    if pose.channel_mask.is_active(channel) {
                        let raw = (values[channel] - pose.channel_offset[channel])
                            / pose.channel_scale[channel];
                        stream.push(raw.round().clamp(0.0, f32::from(u16::MAX)) as u16);
                    }
                }
            }
        }

        log::debug!(
            "Baked {} frames for {} joints into {} channels per frame",
            frames.len(),
            bone_count,
            num_frame_channels
        );

        Ok(Self {
            joints,
            poses,
            animations,
            frames: stream,
            num_frame_channels,
        })
    }
}

/// Split a transform into its ten channel values
fn channel_values(t: &Transform) -> [f32; CHANNELS_PER_BONE] {
    [
        t.translation.x,
        t.translation.y,
        t.translation.z,
        t.rotation.x,
        t.rotation.y,
        t.rotation.z,
        t.rotation.w,
        t.scale.x,
        t.scale.y,
        t.scale.z,
    ]
}

/// Reassemble a transform from ten channel values
///
/// Quantization leaves the rotation slightly off unit length, so it is
/// normalized here.
fn transform_from_channels(v: &[f32; CHANNELS_PER_BONE]) -> Transform {
    let rotation = Quat::from_xyzw(v[3], v[4], v[5], v[6]);
    Transform {
        translation: Vec3::new(v[0], v[1], v[2]),
        rotation: if rotation.length_squared() > 0.0 {
            rotation.normalize()
        } else {
            Quat::IDENTITY
        },
        scale: Vec3::new(v[7], v[8], v[9]),
    }
}
