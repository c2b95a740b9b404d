//! Translation, rotation and scale of an entity.
//!
//! [`Pose`] is the value the transform component stores engine-side. The
//! direction vectors scripts ask for (forward, right, up) are derived from
//! its rotation.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ext::QuatExt;

/// Position, rotation and per-axis scale in 3D space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pose {
    /// World-space position.
    pub translation: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl Pose {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a pose at the given position with default rotation/scale.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Local −Z axis in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local +X axis in world space.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y axis in world space.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotation as `(pitch, yaw, roll)` radians.
    #[must_use]
    pub fn euler_angles(&self) -> Vec3 {
        self.rotation.to_pitch_yaw_roll()
    }

    /// Replace the rotation from `(pitch, yaw, roll)` radians.
    pub fn set_euler_angles(&mut self, angles: Vec3) {
        self.rotation = Quat::from_pitch_yaw_roll(angles.x, angles.y, angles.z);
    }

    /// Compute the 4×4 model matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Translate by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translation += offset;
        self
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_identity_pose() {
        let p = Pose::IDENTITY;
        assert_eq!(p.translation, Vec3::ZERO);
        assert_eq!(p.rotation, Quat::IDENTITY);
        assert_eq!(p.scale, Vec3::ONE);
        assert_eq!(p.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_identity_directions() {
        let p = Pose::IDENTITY;
        assert_eq!(p.forward(), Vec3::NEG_Z);
        assert_eq!(p.right(), Vec3::X);
        assert_eq!(p.up(), Vec3::Y);
    }

    #[test]
    fn test_yaw_turns_forward() {
        let mut p = Pose::IDENTITY;
        p.set_euler_angles(Vec3::new(0.0, FRAC_PI_2, 0.0));
        assert!(p.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(p.euler_angles().abs_diff_eq(Vec3::new(0.0, FRAC_PI_2, 0.0), 1e-5));
    }

    #[test]
    fn test_translated() {
        let p = Pose::from_translation(Vec3::new(1.0, 2.0, 3.0)).translated(Vec3::X);
        assert_eq!(p.translation, Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let p: Pose = serde_json::from_str(r#"{ "translation": [0.0, 4.0, 0.0] }"#).unwrap();
        assert_eq!(p.translation, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(p.scale, Vec3::ONE);
        assert_eq!(p.rotation, Quat::IDENTITY);
    }
}
