use thiserror::Error;

/// Error types for skeleton loading and pose sampling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkeletonError {
    /// A bone names a parent that does not precede it in the bone list
    #[error("Bone {bone} has invalid parent {parent}: parents must precede their children")]
    InvalidParent { bone: usize, parent: usize },

    /// The frame table is not a whole number of bone rows
    #[error("Frame table holds {frames} transforms, which is not a multiple of {bones} bones")]
    FrameTableMismatch { bones: usize, frames: usize },

    /// An animation references frames past the end of the frame table
    #[error(
        "Animation '{name}' spans frames {first_frame}..{end} but the frame table only has {frame_count} frames",
        end = .first_frame.saturating_add(*.num_frames)
    )]
    AnimationRange {
        name: String,
        first_frame: usize,
        num_frames: usize,
        frame_count: usize,
    },

    /// An animation with frames has a framerate that cannot be sampled
    #[error("Animation '{name}' has invalid framerate {framerate}")]
    InvalidFramerate { name: String, framerate: f32 },

    /// The skeleton exceeds the configured bone limit
    #[error("Skeleton has {count} bones, more than the configured maximum of {max}")]
    TooManyBones { count: usize, max: usize },

    /// Import data carries a different number of channel descriptions than joints
    #[error("Import data has {joints} joints but {poses} channel descriptions")]
    PoseCountMismatch { joints: usize, poses: usize },

    /// The active channel masks disagree with the declared channels per frame
    #[error("Channel masks enable {active} channels per frame, but {declared} are declared")]
    ChannelCountMismatch { active: usize, declared: usize },

    /// The packed channel stream does not end on a frame boundary
    #[error("Frame stream of {len} values is not a multiple of {channels} channels per frame")]
    TruncatedFrameStream { len: usize, channels: usize },

    /// A frame handed to the baker has the wrong number of bone transforms
    #[error("Frame {frame} has {actual} transforms, expected {expected}")]
    BakeRowLength {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    /// An animation index does not name an animation of the skeleton
    #[error("Animation index {index} is out of range ({count} animations)")]
    AnimationIndexOutOfRange { index: usize, count: usize },

    /// A sampled frame row is not present in the frame table
    #[error("Animation '{animation}' resolved to frame {row}, but the frame table has {frame_count} frames")]
    FrameOutOfRange {
        animation: String,
        row: usize,
        frame_count: usize,
    },

    /// A pose was built from a frame row that does not cover every bone
    #[error("Pose row has {actual} transforms, expected {expected}")]
    PoseLengthMismatch { expected: usize, actual: usize },
}

/// Result type using SkeletonError
pub type Result<T> = std::result::Result<T, SkeletonError>;
