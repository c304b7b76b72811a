//! Local bone transforms and their interpolation
//!
//! A [`Transform`] is the translation/rotation/scale triple stored for every
//! bone of every baked animation frame. Frames are blended with [`mix`] and
//! turned into matrices with [`to_matrix`].

use glam::{Mat4, Quat, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Trait for values that can be blended between two samples
pub trait Mix: Sized {
    /// Interpolate between `self` (at `t == 0`) and `other` (at `t == 1`)
    fn mix(&self, other: &Self, t: f32) -> Self;
}

impl Mix for f32 {
    fn mix(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Mix for Vec3 {
    fn mix(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

impl Mix for Quat {
    /// Spherical interpolation along the shortest arc
    fn mix(&self, other: &Self, t: f32) -> Self {
        self.slerp(*other, t)
    }
}

/// Translation, rotation and scale of a single bone
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// No translation, no rotation, unit scale
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Compose `Translate * Rotate * Scale`
    ///
    /// Points are scaled first, then rotated, then translated.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Blend two transforms
    ///
    /// Translation and scale are interpolated linearly, rotation with slerp.
    /// The endpoints are returned untouched so `alpha == 0` yields `self` and
    /// `alpha == 1` yields `other` bit for bit.
    pub fn mix(&self, other: &Self, alpha: f32) -> Self {
        if alpha <= 0.0 {
            return *self;
        }
        if alpha >= 1.0 {
            return *other;
        }

        Self {
            translation: self.translation.mix(&other.translation, alpha),
            rotation: self.rotation.mix(&other.rotation, alpha),
            scale: self.scale.mix(&other.scale, alpha),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mix for Transform {
    fn mix(&self, other: &Self, t: f32) -> Self {
        Transform::mix(self, other, t)
    }
}

impl From<Transform> for Mat4 {
    fn from(t: Transform) -> Self {
        t.to_matrix()
    }
}

/// Blend two transforms, see [`Transform::mix`]
pub fn mix(a: &Transform, b: &Transform, alpha: f32) -> Transform {
    a.mix(b, alpha)
}

/// Build the TRS matrix of a transform, see [`Transform::to_matrix`]
pub fn to_matrix(t: &Transform) -> Mat4 {
    t.to_matrix()
}
