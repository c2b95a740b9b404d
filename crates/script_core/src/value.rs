//! Values crossing the native boundary.

use script_math::{Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A property value as the engine stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Quat(Quat),
    Text(String),
}

/// The shape of a [`Value`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Text,
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Float(_) => ValueKind::Float,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Vec3(_) => ValueKind::Vec3,
            Self::Vec4(_) => ValueKind::Vec4,
            Self::Quat(_) => ValueKind::Quat,
            Self::Text(_) => ValueKind::Text,
        }
    }
}

/// Rust types that can be carried by a [`Value`].
///
/// `Default` is what a proxy reports when the engine has nothing to return.
pub trait PropertyValue: Sized + Default {
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    /// `None` when `value` holds a different kind.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! property_value {
    ($ty:ty, $variant:ident) => {
        impl PropertyValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(inner: $ty) -> Self {
                Value::$variant(inner)
            }
        }
    };
}

property_value!(bool, Bool);
property_value!(f32, Float);
property_value!(Vec2, Vec2);
property_value!(Vec3, Vec3);
property_value!(Vec4, Vec4);
property_value!(Quat, Quat);
property_value!(String, Text);
