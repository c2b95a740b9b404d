//! Script behaviour objects and the table that owns them.
//!
//! A [`Script`] is bound to one entity. The runtime calls
//! [`Script::on_create`] once, before the first frame the script takes part
//! in, and [`Script::on_update`] once per frame with the elapsed time.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::entity::EntityId;
use crate::handle::Entity;
use crate::input::Input;
use crate::scene::Scene;
use crate::shared::SharedContext;

/// Upcast helper so script instances can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-entity gameplay behaviour.
pub trait Script: AsAny {
    /// Called once before the script's first update.
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        let _ = ctx;
    }

    /// Called once per frame. `dt` is the elapsed time in seconds.
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let _ = (ctx, dt);
    }
}

/// What a hook gets to work with: its own entity, the scene, and the
/// runtime's shared context.
pub struct ScriptContext<'a> {
    entity: Entity<'a>,
    shared: &'a mut SharedContext,
}

impl<'a> ScriptContext<'a> {
    #[must_use]
    pub fn new(entity: Entity<'a>, shared: &'a mut SharedContext) -> Self {
        Self { entity, shared }
    }

    /// The entity this script is attached to.
    #[must_use]
    pub fn entity(&self) -> Entity<'a> {
        self.entity
    }

    #[must_use]
    pub fn scene(&self) -> Scene<'a> {
        self.entity.scene()
    }

    #[must_use]
    pub fn input(&self) -> Input<'a> {
        self.entity.scene().input()
    }

    /// Shorthand for `ctx.scene().find_entity_by_name(name)`.
    #[must_use]
    pub fn find_entity_by_name(&self, name: &str) -> Option<Entity<'a>> {
        self.entity.scene().find_entity_by_name(name)
    }

    #[must_use]
    pub fn shared(&self) -> &SharedContext {
        &*self.shared
    }

    pub fn shared_mut(&mut self) -> &mut SharedContext {
        &mut *self.shared
    }
}

impl std::fmt::Debug for ScriptContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("entity", &self.entity.id())
            .field("shared", &self.shared)
            .finish()
    }
}

/// A script instance together with the name it was registered under.
pub struct ScriptEntry {
    type_name: String,
    instance: RefCell<Box<dyn Script>>,
}

impl ScriptEntry {
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The instance cell. Borrowed mutably while the script's hooks run.
    #[must_use]
    pub fn instance(&self) -> &RefCell<Box<dyn Script>> {
        &self.instance
    }
}

/// Script instances keyed by the entity they are attached to.
///
/// Entities iterate in id order, which makes update order deterministic:
/// older entities run first.
#[derive(Default)]
pub struct ScriptTable {
    entries: BTreeMap<EntityId, ScriptEntry>,
}

impl ScriptTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `script` to `entity`, returning the script it replaced.
    pub fn insert(
        &mut self,
        entity: EntityId,
        type_name: impl Into<String>,
        script: Box<dyn Script>,
    ) -> Option<Box<dyn Script>> {
        self.entries
            .insert(
                entity,
                ScriptEntry {
                    type_name: type_name.into(),
                    instance: RefCell::new(script),
                },
            )
            .map(|old| old.instance.into_inner())
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<Box<dyn Script>> {
        self.entries
            .remove(&entity)
            .map(|entry| entry.instance.into_inner())
    }

    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&ScriptEntry> {
        self.entries.get(&entity)
    }

    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &ScriptEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Entity ids with an attached script, in update order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.entries.keys().copied().collect()
    }

    /// Drop every script whose entity fails `keep`. Returns the removed ids.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId) -> bool) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.entries.retain(|id, _| {
            let kept = keep(*id);
            if !kept {
                removed.push(*id);
            }
            kept
        });
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ScriptTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, entry)| (id, &entry.type_name)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
    }

    impl Script for Counter {
        fn on_update(&mut self, _ctx: &mut ScriptContext<'_>, _dt: f32) {
            self.ticks += 1;
        }
    }

    struct Idle;

    impl Script for Idle {}

    #[test]
    fn test_insert_replaces() {
        let mut table = ScriptTable::new();
        let id = EntityId::from_raw(1);
        assert!(table.insert(id, "Counter", Box::new(Counter::default())).is_none());
        assert!(table.insert(id, "Idle", Box::new(Idle)).is_some());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(id).map(ScriptEntry::type_name), Some("Idle"));
    }

    #[test]
    fn test_downcast_instance() {
        let mut table = ScriptTable::new();
        let id = EntityId::from_raw(3);
        table.insert(id, "Counter", Box::new(Counter { ticks: 7 }));

        let entry = table.get(id).unwrap();
        let instance = entry.instance().borrow();
        let counter = (**instance).as_any().downcast_ref::<Counter>().unwrap();
        assert_eq!(counter.ticks, 7);
        assert!((**instance).as_any().downcast_ref::<Idle>().is_none());
    }

    #[test]
    fn test_retain_reports_removed() {
        let mut table = ScriptTable::new();
        for raw in 1..=4 {
            table.insert(EntityId::from_raw(raw), "Idle", Box::new(Idle));
        }
        let removed = table.retain(|id| id.raw() % 2 == 0);
        assert_eq!(removed, vec![EntityId::from_raw(1), EntityId::from_raw(3)]);
        assert_eq!(table.entities(), vec![EntityId::from_raw(2), EntityId::from_raw(4)]);
    }
}
