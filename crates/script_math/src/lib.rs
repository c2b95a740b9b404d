//! # script_math
//!
//! Math value types for the script core. Re-exports [`glam`] for vector and
//! quaternion algebra and adds the few helpers scripts lean on: zero-guarded
//! normalization, pitch/yaw/roll construction, and the [`Pose`] triple.
//!
//! All operations are total over `f32`; NaN and infinity propagate per
//! IEEE 754.

pub mod ext;
pub mod pose;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec3Swizzles, Vec4};

pub use ext::{QuatExt, VectorExt};
pub use pose::Pose;
