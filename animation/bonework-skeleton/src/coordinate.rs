//! Coordinate system correction for imported animation frames
//!
//! Some authoring tools export Z-up data while the renderer expects Y-up.
//! The loader can rotate every root bone's animated translation and rotation
//! so the whole hierarchy follows. Child bones are expressed relative to
//! their parent and need no correction. Bind poses are left in source space,
//! which means the correction shows up as a rotation of the skinned mesh.
//!
//! The correction is opt-in: sources that already match the renderer's
//! convention must not be rotated.
//!
//! # Examples
//!
//! ```rust
//! use bonework_skeleton::{RootCorrection, Transform};
//! use glam::Vec3;
//!
//! let t = Transform::from_translation(Vec3::new(0.0, 0.0, 1.0));
//! let fixed = RootCorrection::ZUpToYUp.apply(t);
//!
//! // Source up (+Z) becomes renderer up (+Y)
//! assert!(fixed.translation.abs_diff_eq(Vec3::Y, 1e-6));
//! ```

use crate::transform::Transform;
use glam::{Quat, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Rotation applied to root bone frames at load time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum RootCorrection {
    /// Keep frames in the source coordinate system
    #[default]
    None,
    /// Rotate -90 degrees about X, turning Z-up data into Y-up data
    ZUpToYUp,
    /// Rotate by an arbitrary quaternion
    Rotation(Quat),
}

impl RootCorrection {
    /// The correcting rotation, if any
    pub fn rotation(&self) -> Option<Quat> {
        match self {
            RootCorrection::None => None,
            RootCorrection::ZUpToYUp => Some(Quat::from_axis_angle(
                Vec3::X,
                (-90.0_f32).to_radians(),
            )),
            RootCorrection::Rotation(q) => Some(q.normalize()),
        }
    }

    /// Check whether this correction changes anything
    pub fn is_identity(&self) -> bool {
        self.rotation().is_none()
    }

    /// Rotate a root bone frame transform
    ///
    /// Translation and rotation are premultiplied by the correction; scale is
    /// kept as is.
    pub fn apply(&self, transform: Transform) -> Transform {
        match self.rotation() {
            Some(q) => Transform {
                translation: q * transform.translation,
                rotation: q * transform.rotation,
                scale: transform.scale,
            },
            None => transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.4),
            Vec3::splat(2.0),
        );
        assert!(RootCorrection::None.is_identity());
        assert_eq!(RootCorrection::None.apply(t), t);
    }

    #[test]
    fn test_z_up_to_y_up_axes() {
        let fix = RootCorrection::ZUpToYUp;

        let up = fix.apply(Transform::from_translation(Vec3::Z)).translation;
        assert!(up.abs_diff_eq(Vec3::Y, 1e-6));

        // Source forward (+Y) ends up pointing away from the viewer (-Z)
        let forward = fix.apply(Transform::from_translation(Vec3::Y)).translation;
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-6));

        let right = fix.apply(Transform::from_translation(Vec3::X)).translation;
        assert!(right.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_rotation_is_premultiplied_and_scale_kept() {
        let fix = RootCorrection::ZUpToYUp;
        let t = Transform::new(Vec3::ZERO, Quat::from_rotation_z(0.5), Vec3::splat(3.0));

        let fixed = fix.apply(t);
        let expected = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2) * t.rotation;
        assert!(fixed.rotation.abs_diff_eq(expected, 1e-6));
        assert_eq!(fixed.scale, Vec3::splat(3.0));
    }

    #[test]
    fn test_custom_rotation_is_normalized() {
        let fix = RootCorrection::Rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 2.0));
        assert!(fix.rotation().unwrap().abs_diff_eq(Quat::IDENTITY, 1e-6));
    }
}
