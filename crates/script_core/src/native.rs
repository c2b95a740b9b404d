//! The native-call surface.
//!
//! [`NativeCalls`] is the whole contract between scripts and the engine.
//! Each method is a synchronous request/response: it either mutates engine
//! state or returns what the engine reports. Nothing here validates its
//! arguments and nothing can fail; the engine decides what a call on a dead
//! entity or a missing component means (typically a no-op and an empty
//! read).
//!
//! Methods take `&self`. The engine behind the trait owns its state and
//! mutates it through interior mutability, the same way a foreign call
//! mutates memory the caller never sees. Calls are expected from the update
//! thread only.

use script_math::{Vec2, Vec3};

use crate::command::{Command, Query};
use crate::component::ComponentTypeId;
use crate::entity::EntityId;
use crate::input::{KeyCode, MouseCode};
use crate::property::Property;
use crate::value::Value;

pub trait NativeCalls {
    // Entities

    /// Whether `entity` still exists engine-side.
    fn is_alive(&self, entity: EntityId) -> bool;

    fn has_component(&self, entity: EntityId, component: ComponentTypeId) -> bool;

    /// Attach a default-initialized component. Attaching twice is the
    /// engine's business; the binding layer checks first.
    fn add_component(&self, entity: EntityId, component: ComponentTypeId);

    /// [`EntityId::INVALID`] when no entity has that name.
    fn find_entity_by_name(&self, name: &str) -> EntityId;

    /// Clone `prefab` at `translation`. [`EntityId::INVALID`] when the
    /// engine could not create it.
    fn instantiate(&self, prefab: EntityId, translation: Vec3) -> EntityId;

    fn destroy(&self, entity: EntityId);

    // Component state

    fn get_property(&self, entity: EntityId, property: Property) -> Option<Value>;

    fn set_property(&self, entity: EntityId, property: Property, value: Value);

    fn invoke(&self, entity: EntityId, command: Command);

    fn query(&self, entity: EntityId, query: &Query) -> Option<Value>;

    // Input

    fn is_key_pressed(&self, key: KeyCode) -> bool;

    fn is_key_released(&self, key: KeyCode) -> bool;

    fn is_mouse_down(&self, button: MouseCode) -> bool;

    fn is_mouse_up(&self, button: MouseCode) -> bool;

    fn mouse_position(&self) -> Vec2;

    fn set_mouse_position(&self, position: Vec2);

    fn mouse_delta(&self) -> Vec2;

    fn is_mouse_dragging(&self) -> bool;

    fn is_mouse_hidden(&self) -> bool;

    fn set_mouse_hidden(&self, hidden: bool);

    fn toggle_mouse_lock(&self);

    // Scene

    /// Whether the game viewport has focus.
    fn is_focusing(&self) -> bool;
}
