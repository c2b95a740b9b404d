//! The id scripts use to name an entity.
//!
//! The engine creates and destroys entities; scripts only ever hold the
//! number it handed out. Holding an [`EntityId`] keeps nothing alive, and a
//! stale id simply stops matching anything engine-side.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An engine-owned entity, held by value.
///
/// Ids cross the native boundary as raw `u64`s, and `0` is how the engine
/// says "no entity". [`EntityId::found`] turns that convention into an
/// `Option` on the script side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// What the engine returns when a lookup or instantiation finds nothing.
    pub const INVALID: EntityId = EntityId(0);

    /// Wrap a raw id received from the engine.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// `None` for [`EntityId::INVALID`], the id itself otherwise.
    #[must_use]
    pub const fn found(self) -> Option<Self> {
        if self.0 == 0 { None } else { Some(self) }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_filters_the_miss_sentinel() {
        assert_eq!(EntityId::INVALID.found(), None);
        assert_eq!(EntityId::from_raw(7).found(), Some(EntityId::from_raw(7)));
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let id = EntityId::from_raw(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(serde_json::from_str::<EntityId>("42").unwrap(), id);
        assert_eq!(id.to_string(), "#42");
        assert_eq!(id.raw(), 42);
    }
}
