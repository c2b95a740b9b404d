//! The entity handle scripts work with.
//!
//! An [`Entity`] is an [`EntityId`] plus the [`Scene`] it lives in. It owns
//! nothing: presence of components, liveness and every property value are
//! asked of the engine on each call.

use std::cell::RefMut;
use std::fmt;

use script_math::{Quat, Vec3};

use crate::command::{Command, Query};
use crate::component::Component;
use crate::entity::EntityId;
use crate::property::{Property, RemoteProperty};
use crate::scene::Scene;
use crate::script::Script;
use crate::value::PropertyValue;

/// A lightweight, copyable handle to an engine entity.
#[derive(Clone, Copy)]
pub struct Entity<'a> {
    id: EntityId,
    scene: Scene<'a>,
}

impl<'a> Entity<'a> {
    pub(crate) fn new(id: EntityId, scene: Scene<'a>) -> Self {
        Self { id, scene }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn scene(&self) -> Scene<'a> {
        self.scene
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.scene.native().is_alive(self.id)
    }

    // Components

    #[must_use]
    pub fn has_component<T: Component<'a>>(&self) -> bool {
        self.scene
            .native()
            .has_component(self.id, T::component_type_id())
    }

    /// The component if the engine reports it present, `None` otherwise.
    #[must_use]
    pub fn get_component<T: Component<'a>>(&self) -> Option<T> {
        self.has_component::<T>().then(|| T::bind(*self))
    }

    /// Attach `T` unless already present. Calling this twice yields proxies
    /// for the same engine component and attaches only once.
    pub fn add_component<T: Component<'a>>(&self) -> T {
        if !self.has_component::<T>() {
            self.scene
                .native()
                .add_component(self.id, T::component_type_id());
        }
        T::bind(*self)
    }

    /// Same as [`Entity::add_component`]; reads better at call sites that
    /// expect the component to usually exist.
    pub fn get_or_add_component<T: Component<'a>>(&self) -> T {
        self.add_component::<T>()
    }

    // Lookup and lifetime

    /// Search the whole scene by name.
    #[must_use]
    pub fn find_entity_by_name(&self, name: &str) -> Option<Entity<'a>> {
        self.scene.find_entity_by_name(name)
    }

    /// Spawn a copy of this entity at `translation`. `None` when the engine
    /// could not create it (for instance because this entity is gone).
    pub fn instantiate(&self, translation: Vec3) -> Option<Entity<'a>> {
        let id = self.scene.native().instantiate(self.id, translation);
        id.found().map(|id| self.scene.entity(id))
    }

    /// Ask the engine to remove this entity. The handle stays usable as a
    /// value but every later call is up to the engine.
    pub fn destroy(&self) {
        self.scene.native().destroy(self.id);
    }

    /// The script attached to this entity, downcast to `T`.
    ///
    /// `None` when there is no script, when it is not a `T`, or when it is
    /// already borrowed (a script asking for its own instance from inside
    /// one of its hooks).
    #[must_use]
    pub fn as_script<T: Script>(&self) -> Option<RefMut<'a, T>> {
        let entry = self.scene.scripts().get(self.id)?;
        let instance = entry.instance().try_borrow_mut().ok()?;
        RefMut::filter_map(instance, |script| (**script).as_any_mut().downcast_mut::<T>()).ok()
    }

    // Transform shortcuts

    #[must_use]
    pub fn translation(&self) -> RemoteProperty<'a, Vec3> {
        self.property(Property::Translation)
    }

    #[must_use]
    pub fn rotation(&self) -> RemoteProperty<'a, Quat> {
        self.property(Property::Rotation)
    }

    #[must_use]
    pub fn scale(&self) -> RemoteProperty<'a, Vec3> {
        self.property(Property::Scale)
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.read(Property::Forward)
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.read(Property::Right)
    }

    #[must_use]
    pub fn visible(&self) -> RemoteProperty<'a, bool> {
        self.property(Property::Visible)
    }

    // Raw forwarding used by the proxies

    /// A typed handle to one property of this entity.
    #[must_use]
    pub fn property<T: PropertyValue>(&self, property: Property) -> RemoteProperty<'a, T> {
        RemoteProperty::new(self.scene.native(), self.id, property)
    }

    /// One-off read of a property.
    #[must_use]
    pub fn read<T: PropertyValue>(&self, property: Property) -> T {
        self.property::<T>(property).get()
    }

    pub fn invoke(&self, command: Command) {
        self.scene.native().invoke(self.id, command);
    }

    /// Run a query, reporting `T::default()` when the engine has no answer.
    #[must_use]
    pub fn query<T: PropertyValue>(&self, query: Query) -> T {
        self.scene
            .native()
            .query(self.id, &query)
            .and_then(T::from_value)
            .unwrap_or_default()
    }
}

impl PartialEq for Entity<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity<'_> {}

impl fmt::Debug for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entity").field(&self.id.raw()).finish()
    }
}

impl fmt::Display for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}
