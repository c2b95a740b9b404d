//! Component type identity and the [`Component`] proxy trait.
//!
//! ## Type identity
//!
//! [`ComponentTypeId`] is derived from the component's **string name** using
//! FNV-1a 64-bit. The hash is deterministic and language neutral, so an
//! engine written in anything can compute the same id for `"Rigidbody2D"`
//! and answer `has_component` without sharing Rust type information.

use serde::{Deserialize, Serialize};

use crate::handle::Entity;

/// Identifier of a component type: FNV-1a 64-bit of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    pub const TRANSFORM: Self = Self::from_name("Transform");
    pub const RIGIDBODY: Self = Self::from_name("Rigidbody");
    pub const RIGIDBODY_2D: Self = Self::from_name("Rigidbody2D");
    pub const AUDIO: Self = Self::from_name("Audio");
    pub const TEXT: Self = Self::from_name("Text");
    pub const SPRITE_RENDERER_2D: Self = Self::from_name("SpriteRenderer2D");
    pub const SPRITE_ANIMATION: Self = Self::from_name("SpriteAnimation");
    pub const CIRCLE_RENDERER: Self = Self::from_name("CircleRenderer");
    pub const BOX_COLLIDER_2D: Self = Self::from_name("BoxCollider2D");
    pub const CIRCLE_COLLIDER_2D: Self = Self::from_name("CircleCollider2D");
    pub const UI: Self = Self::from_name("UI");

    /// Names of every component type the binding layer has a proxy for.
    pub const BUILTIN_NAMES: [&'static str; 11] = [
        "Transform",
        "Rigidbody",
        "Rigidbody2D",
        "Audio",
        "Text",
        "SpriteRenderer2D",
        "SpriteAnimation",
        "CircleRenderer",
        "BoxCollider2D",
        "CircleCollider2D",
        "UI",
    ];

    /// Hash a component name with FNV-1a 64-bit.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Resolve a builtin component by name, `None` for names without a proxy.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        Self::BUILTIN_NAMES
            .contains(&name)
            .then(|| Self::from_name(name))
    }
}

/// A typed proxy for one component of one entity.
///
/// Proxies hold nothing but their owning [`Entity`]; every read and write
/// goes straight to the native surface. They are created on demand by
/// [`Entity::get_component`] and [`Entity::add_component`].
pub trait Component<'a>: Sized {
    /// The component's engine-side type name (e.g. `"Rigidbody2D"`).
    fn type_name() -> &'static str;

    /// FNV-1a hash of [`Component::type_name`].
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }

    /// Wrap an entity handle. Does not check that the component is present.
    fn bind(entity: Entity<'a>) -> Self;

    /// The entity this proxy forwards to.
    fn entity(&self) -> Entity<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a of the empty string is the offset basis itself.
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
        // "a" -> 0xaf63dc4c8601ec8c
        assert_eq!(
            ComponentTypeId::from_name("a"),
            ComponentTypeId(0xaf63_dc4c_8601_ec8c)
        );
    }

    #[test]
    fn test_builtin_ids_are_distinct() {
        let mut ids: Vec<_> = ComponentTypeId::BUILTIN_NAMES
            .iter()
            .map(|name| ComponentTypeId::from_name(name))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), ComponentTypeId::BUILTIN_NAMES.len());
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(
            ComponentTypeId::builtin("Rigidbody2D"),
            Some(ComponentTypeId::RIGIDBODY_2D)
        );
        assert_eq!(ComponentTypeId::builtin("Velocity"), None);
    }
}
