//! Extension traits over the glam value types.

use glam::{EulerRot, Quat, Vec2, Vec3, Vec4};

/// Zero-guarded normalization shared by the vector types.
pub trait VectorExt: Sized {
    /// Returns the unit vector in the same direction, or the zero vector when
    /// the length is zero. Never produces NaN from a zero input.
    #[must_use]
    fn normalized(self) -> Self;
}

impl VectorExt for Vec2 {
    fn normalized(self) -> Self {
        self.normalize_or_zero()
    }
}

impl VectorExt for Vec3 {
    fn normalized(self) -> Self {
        self.normalize_or_zero()
    }
}

impl VectorExt for Vec4 {
    fn normalized(self) -> Self {
        self.normalize_or_zero()
    }
}

/// Quaternion helpers used by scripts and the transform proxies.
pub trait QuatExt: Sized {
    /// Build a rotation from pitch (about X), yaw (about Y) and roll
    /// (about Z), in radians. Yaw is applied first, then pitch, then roll.
    #[must_use]
    fn from_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32) -> Self;

    /// Decompose into `(pitch, yaw, roll)` radians, the inverse of
    /// [`QuatExt::from_pitch_yaw_roll`].
    #[must_use]
    fn to_pitch_yaw_roll(self) -> Vec3;

    /// Normalize, falling back to identity for a zero-magnitude quaternion.
    #[must_use]
    fn normalized_or_identity(self) -> Self;
}

impl QuatExt for Quat {
    fn from_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32) -> Self {
        Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll)
    }

    fn to_pitch_yaw_roll(self) -> Vec3 {
        let (yaw, pitch, roll) = self.to_euler(EulerRot::YXZ);
        Vec3::new(pitch, yaw, roll)
    }

    fn normalized_or_identity(self) -> Self {
        let magnitude = self.length();
        if magnitude > 0.0 {
            self / magnitude
        } else {
            Quat::IDENTITY
        }
    }
}
