//! The property catalog and [`RemoteProperty`].
//!
//! Every readable or writable component field the engine exposes is one
//! [`Property`] variant. A variant fixes which component owns the field and
//! which [`ValueKind`] it carries, so a single getter/setter pair on
//! [`NativeCalls`] serves every component.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::component::ComponentTypeId;
use crate::entity::EntityId;
use crate::native::NativeCalls;
use crate::value::{PropertyValue, ValueKind};

/// A component field addressable through the native surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    // Entity
    Visible,

    // Transform
    Translation,
    Rotation,
    EulerAngles,
    Scale,
    Forward,
    Right,
    Up,

    // Rigidbody
    LinearVelocity,
    BodyFriction,
    BodyRestitution,
    GravityFactor,

    // Rigidbody2D
    Velocity2D,

    // Audio
    AudioName,
    AudioVolume,
    AudioPitch,
    AudioMinDistance,
    AudioMaxDistance,
    AudioLooping,
    AudioSpatial,
    AudioPlayAtStart,

    // Text
    TextString,
    TextColor,
    TextKerning,
    TextLineSpacing,

    // SpriteRenderer2D
    SpriteColor,
    SpriteFlipX,
    SpriteFlipY,
    SpriteTilingFactor,

    // SpriteAnimation
    AnimationActiveState,

    // CircleRenderer
    CircleColor,
    CircleThickness,
    CircleFade,

    // BoxCollider2D
    BoxOffset,
    BoxSize,
    BoxDensity,
    BoxFriction,
    BoxRestitution,
    BoxRestitutionThreshold,

    // CircleCollider2D
    CircleOffset,
    CircleRadius,
    CircleDensity,
    CircleFriction,
    CircleRestitution,
    CircleRestitutionThreshold,
}

impl Property {
    /// The component that must be present for this property to exist.
    /// `None` for properties of the entity itself.
    #[must_use]
    pub const fn component(self) -> Option<ComponentTypeId> {
        use Property::*;
        let id = match self {
            Visible => return None,
            Translation | Rotation | EulerAngles | Scale | Forward | Right | Up => {
                ComponentTypeId::TRANSFORM
            }
            LinearVelocity | BodyFriction | BodyRestitution | GravityFactor => {
                ComponentTypeId::RIGIDBODY
            }
            Velocity2D => ComponentTypeId::RIGIDBODY_2D,
            AudioName | AudioVolume | AudioPitch | AudioMinDistance | AudioMaxDistance
            | AudioLooping | AudioSpatial | AudioPlayAtStart => ComponentTypeId::AUDIO,
            TextString | TextColor | TextKerning | TextLineSpacing => ComponentTypeId::TEXT,
            SpriteColor | SpriteFlipX | SpriteFlipY | SpriteTilingFactor => {
                ComponentTypeId::SPRITE_RENDERER_2D
            }
            AnimationActiveState => ComponentTypeId::SPRITE_ANIMATION,
            CircleColor | CircleThickness | CircleFade => ComponentTypeId::CIRCLE_RENDERER,
            BoxOffset | BoxSize | BoxDensity | BoxFriction | BoxRestitution
            | BoxRestitutionThreshold => ComponentTypeId::BOX_COLLIDER_2D,
            CircleOffset | CircleRadius | CircleDensity | CircleFriction | CircleRestitution
            | CircleRestitutionThreshold => ComponentTypeId::CIRCLE_COLLIDER_2D,
        };
        Some(id)
    }

    /// The kind of value this property carries.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        use Property::*;
        match self {
            Visible | AudioLooping | AudioSpatial | AudioPlayAtStart | SpriteFlipX
            | SpriteFlipY => ValueKind::Bool,
            BodyFriction | BodyRestitution | GravityFactor | AudioVolume | AudioPitch
            | AudioMinDistance | AudioMaxDistance | TextKerning | TextLineSpacing
            | CircleThickness | CircleFade | BoxDensity | BoxFriction | BoxRestitution
            | BoxRestitutionThreshold | CircleRadius | CircleDensity | CircleFriction
            | CircleRestitution | CircleRestitutionThreshold => ValueKind::Float,
            Velocity2D | SpriteTilingFactor | BoxOffset | BoxSize | CircleOffset => {
                ValueKind::Vec2
            }
            Translation | EulerAngles | Scale | Forward | Right | Up | LinearVelocity
            | TextColor | CircleColor => ValueKind::Vec3,
            SpriteColor => ValueKind::Vec4,
            Rotation => ValueKind::Quat,
            AudioName | TextString | AnimationActiveState => ValueKind::Text,
        }
    }

    /// Direction vectors are derived from the rotation and can't be written.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Property::Forward | Property::Right | Property::Up)
    }
}

/// One property of one entity, read and written through the native surface.
///
/// Nothing is cached: [`get`](Self::get) issues a native read each time and
/// [`set`](Self::set) a native write.
pub struct RemoteProperty<'a, T> {
    native: &'a dyn NativeCalls,
    entity: EntityId,
    property: Property,
    _value: PhantomData<fn() -> T>,
}

impl<'a, T: PropertyValue> RemoteProperty<'a, T> {
    pub(crate) fn new(native: &'a dyn NativeCalls, entity: EntityId, property: Property) -> Self {
        debug_assert_eq!(property.kind(), T::KIND, "{property:?} carries {:?}", property.kind());
        Self {
            native,
            entity,
            property,
            _value: PhantomData,
        }
    }

    /// Read the current value. Reports `T::default()` when the engine
    /// returns nothing or a value of another kind.
    #[must_use]
    pub fn get(&self) -> T {
        self.native
            .get_property(self.entity, self.property)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Write a new value.
    pub fn set(&self, value: T) {
        self.native
            .set_property(self.entity, self.property, value.into_value());
    }

    /// Read, modify, write back. Two native calls.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.set(f(self.get()));
    }

    #[must_use]
    pub fn property(&self) -> Property {
        self.property
    }

    #[must_use]
    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

impl<T> fmt::Debug for RemoteProperty<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteProperty")
            .field("entity", &self.entity)
            .field("property", &self.property)
            .finish()
    }
}
