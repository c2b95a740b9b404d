//! The view a script hook has on the engine.

use std::fmt;

use crate::entity::EntityId;
use crate::handle::Entity;
use crate::input::Input;
use crate::native::NativeCalls;
use crate::script::ScriptTable;

/// Native surface plus the table of live script instances.
///
/// `Scene` is `Copy`; every [`Entity`] handle carries one.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    native: &'a dyn NativeCalls,
    scripts: &'a ScriptTable,
}

impl<'a> Scene<'a> {
    #[must_use]
    pub fn new(native: &'a dyn NativeCalls, scripts: &'a ScriptTable) -> Self {
        Self { native, scripts }
    }

    #[must_use]
    pub fn native(&self) -> &'a dyn NativeCalls {
        self.native
    }

    #[must_use]
    pub fn scripts(&self) -> &'a ScriptTable {
        self.scripts
    }

    /// Wrap a raw id. The handle is not checked for liveness.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Entity<'a> {
        Entity::new(id, *self)
    }

    /// `None` when no entity carries `name`.
    #[must_use]
    pub fn find_entity_by_name(&self, name: &str) -> Option<Entity<'a>> {
        let id = self.native.find_entity_by_name(name);
        id.found().map(|id| self.entity(id))
    }

    #[must_use]
    pub fn input(&self) -> Input<'a> {
        Input::new(self.native)
    }

    #[must_use]
    pub fn is_focusing(&self) -> bool {
        self.native.is_focusing()
    }
}

impl fmt::Debug for Scene<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("scripts", &self.scripts.len())
            .finish_non_exhaustive()
    }
}
