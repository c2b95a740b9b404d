//! An in-process engine behind [`NativeCalls`].
//!
//! [`MemoryEngine`] keeps entities, components and input in plain maps. It
//! has no renderer and no real physics: bodies carry a velocity that
//! [`MemoryEngine::step`] integrates, impulses change that velocity and
//! forces are accumulated until the next step. Commands a script sends are
//! recorded until [`MemoryEngine::end_frame`] so tests can assert on them.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use script_math::{Pose, QuatExt, Vec2, Vec3, Vec4};
use tracing::{debug, trace, warn};

use crate::command::{Command, Query};
use crate::component::ComponentTypeId;
use crate::entity::EntityId;
use crate::input::{KeyCode, MouseCode};
use crate::native::NativeCalls;
use crate::property::Property;
use crate::value::Value;

#[derive(Debug, Clone)]
struct EntityRecord {
    name: String,
    components: BTreeSet<ComponentTypeId>,
    attach_counts: BTreeMap<ComponentTypeId, usize>,
    pose: Pose,
    visible: bool,
    properties: HashMap<Property, Value>,
    body_active: bool,
    pending_force: Vec3,
    pending_force_2d: Vec2,
    contacts: Vec<String>,
    ui_texts: BTreeMap<String, String>,
}

impl EntityRecord {
    fn new(name: &str, pose: Pose) -> Self {
        let mut record = Self {
            name: name.to_owned(),
            components: BTreeSet::new(),
            attach_counts: BTreeMap::new(),
            pose,
            visible: true,
            properties: HashMap::new(),
            body_active: true,
            pending_force: Vec3::ZERO,
            pending_force_2d: Vec2::ZERO,
            contacts: Vec::new(),
            ui_texts: BTreeMap::new(),
        };
        record.attach(ComponentTypeId::TRANSFORM);
        record
    }

    fn has(&self, component: ComponentTypeId) -> bool {
        self.components.contains(&component)
    }

    fn attach(&mut self, component: ComponentTypeId) {
        *self.attach_counts.entry(component).or_default() += 1;
        if self.components.insert(component) {
            for (property, value) in default_properties(component) {
                self.properties.insert(property, value);
            }
        }
    }

    fn detach(&mut self, component: ComponentTypeId) {
        self.components.remove(&component);
        self.properties
            .retain(|property, _| property.component() != Some(component));
    }

    fn float(&self, property: Property) -> f32 {
        match self.properties.get(&property) {
            Some(Value::Float(value)) => *value,
            _ => 0.0,
        }
    }

    fn vec3(&self, property: Property) -> Vec3 {
        match self.properties.get(&property) {
            Some(Value::Vec3(value)) => *value,
            _ => Vec3::ZERO,
        }
    }

    fn vec2(&self, property: Property) -> Vec2 {
        match self.properties.get(&property) {
            Some(Value::Vec2(value)) => *value,
            _ => Vec2::ZERO,
        }
    }

    fn read(&self, property: Property) -> Option<Value> {
        let value = match property {
            Property::Visible => Value::Bool(self.visible),
            Property::Translation => Value::Vec3(self.pose.translation),
            Property::Rotation => Value::Quat(self.pose.rotation),
            Property::EulerAngles => Value::Vec3(self.pose.euler_angles()),
            Property::Scale => Value::Vec3(self.pose.scale),
            Property::Forward => Value::Vec3(self.pose.forward()),
            Property::Right => Value::Vec3(self.pose.right()),
            Property::Up => Value::Vec3(self.pose.up()),
            other => return self.properties.get(&other).cloned(),
        };
        Some(value)
    }

    fn write(&mut self, property: Property, value: Value) {
        match (property, value) {
            (Property::Visible, Value::Bool(visible)) => self.visible = visible,
            (Property::Translation, Value::Vec3(translation)) => {
                self.pose.translation = translation;
            }
            (Property::Rotation, Value::Quat(rotation)) => {
                self.pose.rotation = rotation.normalized_or_identity();
            }
            (Property::EulerAngles, Value::Vec3(angles)) => self.pose.set_euler_angles(angles),
            (Property::Scale, Value::Vec3(scale)) => self.pose.scale = scale,
            (other, value) => {
                self.properties.insert(other, value);
            }
        }
    }

    fn apply(&mut self, command: &Command) {
        match command {
            Command::AddForce(force) => self.pending_force += *force,
            Command::AddForceAndTorque { force, .. } => self.pending_force += *force,
            Command::AddTorque(_) | Command::AddAngularImpulse(_) => {}
            Command::AddImpulse(delta) | Command::AddLinearVelocity(delta) => {
                let velocity = self.vec3(Property::LinearVelocity) + *delta;
                self.properties
                    .insert(Property::LinearVelocity, Value::Vec3(velocity));
            }
            Command::MoveKinematic {
                position,
                euler_angles,
                ..
            } => {
                self.pose.translation = *position;
                self.pose.set_euler_angles(*euler_angles);
            }
            Command::SetPosition { position, activate } => {
                self.pose.translation = *position;
                self.body_active |= *activate;
            }
            Command::SetEulerAngles {
                euler_angles,
                activate,
            } => {
                self.pose.set_euler_angles(*euler_angles);
                self.body_active |= *activate;
            }
            Command::SetRotation { rotation, activate } => {
                self.pose.rotation = rotation.normalized_or_identity();
                self.body_active |= *activate;
            }
            Command::ActivateBody => self.body_active = true,
            Command::DeactivateBody => self.body_active = false,
            Command::DestroyBody => self.detach(ComponentTypeId::RIGIDBODY),
            Command::ApplyLinearImpulse { impulse, wake, .. }
            | Command::ApplyLinearImpulseToCenter { impulse, wake } => {
                let velocity = self.vec2(Property::Velocity2D) + *impulse;
                self.properties
                    .insert(Property::Velocity2D, Value::Vec2(velocity));
                self.body_active |= *wake;
            }
            Command::ApplyForce { force, wake, .. }
            | Command::ApplyForceToCenter { force, wake } => {
                self.pending_force_2d += *force;
                self.body_active |= *wake;
            }
            Command::Play | Command::PlayOverlapping | Command::PlayLooped | Command::Stop => {}
            Command::SetUiText { name, text } => {
                self.ui_texts.insert(name.clone(), text.clone());
            }
        }
    }

    fn answer(&self, query: &Query) -> Option<Value> {
        let value = match query {
            Query::BodyRotation => Value::Quat(self.pose.rotation),
            Query::BodyEulerAngles => Value::Vec3(self.pose.euler_angles()),
            Query::BodyCenterOfMass => Value::Vec3(self.pose.translation),
            Query::BodyIsActive => Value::Bool(self.body_active),
            Query::IsContactWithTag(tag) => Value::Bool(self.contacts.iter().any(|c| c == tag)),
            Query::ContactTag => Value::Text(self.contacts.first().cloned().unwrap_or_default()),
            Query::UiText(name) => Value::Text(self.ui_texts.get(name)?.clone()),
        };
        Some(value)
    }

    fn step(&mut self, dt: f32, gravity: Vec3) {
        if self.has(ComponentTypeId::RIGIDBODY) && self.body_active {
            let acceleration = self.pending_force + gravity * self.float(Property::GravityFactor);
            let velocity = self.vec3(Property::LinearVelocity) + acceleration * dt;
            self.properties
                .insert(Property::LinearVelocity, Value::Vec3(velocity));
            self.pose.translation += velocity * dt;
        }
        if self.has(ComponentTypeId::RIGIDBODY_2D) && self.body_active {
            let velocity =
                self.vec2(Property::Velocity2D) + (self.pending_force_2d + gravity.truncate()) * dt;
            self.properties
                .insert(Property::Velocity2D, Value::Vec2(velocity));
            self.pose.translation += (velocity * dt).extend(0.0);
        }
        self.pending_force = Vec3::ZERO;
        self.pending_force_2d = Vec2::ZERO;
    }
}

/// Field values a freshly attached component starts with.
fn default_properties(component: ComponentTypeId) -> Vec<(Property, Value)> {
    use Property::*;
    match component {
        ComponentTypeId::RIGIDBODY => vec![
            (LinearVelocity, Value::Vec3(Vec3::ZERO)),
            (BodyFriction, Value::Float(0.5)),
            (BodyRestitution, Value::Float(0.0)),
            (GravityFactor, Value::Float(1.0)),
        ],
        ComponentTypeId::RIGIDBODY_2D => vec![(Velocity2D, Value::Vec2(Vec2::ZERO))],
        ComponentTypeId::AUDIO => vec![
            (AudioName, Value::Text(String::new())),
            (AudioVolume, Value::Float(1.0)),
            (AudioPitch, Value::Float(1.0)),
            (AudioMinDistance, Value::Float(10.0)),
            (AudioMaxDistance, Value::Float(20.0)),
            (AudioLooping, Value::Bool(false)),
            (AudioSpatial, Value::Bool(false)),
            (AudioPlayAtStart, Value::Bool(false)),
        ],
        ComponentTypeId::TEXT => vec![
            (TextString, Value::Text(String::new())),
            (TextColor, Value::Vec3(Vec3::ONE)),
            (TextKerning, Value::Float(0.0)),
            (TextLineSpacing, Value::Float(0.0)),
        ],
        ComponentTypeId::SPRITE_RENDERER_2D => vec![
            (SpriteColor, Value::Vec4(Vec4::ONE)),
            (SpriteFlipX, Value::Bool(false)),
            (SpriteFlipY, Value::Bool(false)),
            (SpriteTilingFactor, Value::Vec2(Vec2::ONE)),
        ],
        ComponentTypeId::SPRITE_ANIMATION => {
            vec![(AnimationActiveState, Value::Text(String::new()))]
        }
        ComponentTypeId::CIRCLE_RENDERER => vec![
            (CircleColor, Value::Vec3(Vec3::ONE)),
            (CircleThickness, Value::Float(1.0)),
            (CircleFade, Value::Float(0.005)),
        ],
        ComponentTypeId::BOX_COLLIDER_2D => vec![
            (BoxOffset, Value::Vec2(Vec2::ZERO)),
            (BoxSize, Value::Vec2(Vec2::splat(0.5))),
            (BoxDensity, Value::Float(1.0)),
            (BoxFriction, Value::Float(0.5)),
            (BoxRestitution, Value::Float(0.0)),
            (BoxRestitutionThreshold, Value::Float(0.5)),
        ],
        ComponentTypeId::CIRCLE_COLLIDER_2D => vec![
            (CircleOffset, Value::Vec2(Vec2::ZERO)),
            (CircleRadius, Value::Float(0.5)),
            (CircleDensity, Value::Float(1.0)),
            (CircleFriction, Value::Float(0.5)),
            (CircleRestitution, Value::Float(0.0)),
            (CircleRestitutionThreshold, Value::Float(0.5)),
        ],
        _ => Vec::new(),
    }
}

#[derive(Debug, Default)]
struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_down: HashSet<MouseCode>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    mouse_hidden: bool,
    mouse_locked: bool,
}

/// Hands out ids from 1 upwards. Ids are never reused, so a destroyed
/// entity's id stays dead.
#[derive(Debug)]
struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId::from_raw(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug)]
struct EngineState {
    allocator: EntityAllocator,
    entities: BTreeMap<EntityId, EntityRecord>,
    input: InputState,
    focusing: bool,
    gravity: Vec3,
    commands: Vec<(EntityId, Command)>,
    commands_applied: u64,
}

/// In-memory implementation of the native surface.
#[derive(Debug)]
pub struct MemoryEngine {
    state: RefCell<EngineState>,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RefCell::new(EngineState {
                allocator: EntityAllocator::new(),
                entities: BTreeMap::new(),
                input: InputState::default(),
                focusing: true,
                gravity: Vec3::ZERO,
                commands: Vec::new(),
                commands_applied: 0,
            }),
        }
    }

    // Scene setup

    /// Create a named entity with a [`Transform`](crate::components::Transform)
    /// at the origin.
    pub fn spawn(&self, name: &str) -> EntityId {
        self.spawn_with_pose(name, Pose::IDENTITY)
    }

    pub fn spawn_with_pose(&self, name: &str, pose: Pose) -> EntityId {
        let mut state = self.state.borrow_mut();
        let id = state.allocator.allocate();
        state.entities.insert(id, EntityRecord::new(name, pose));
        debug!(%id, name, "spawned entity");
        id
    }

    /// Attach `component` directly. Returns `false` when `entity` is gone.
    pub fn attach(&self, entity: EntityId, component: ComponentTypeId) -> bool {
        let mut state = self.state.borrow_mut();
        match state.entities.get_mut(&entity) {
            Some(record) => {
                record.attach(component);
                true
            }
            None => false,
        }
    }

    /// Replace the tags `entity` is currently touching.
    pub fn set_contacts<I, S>(&self, entity: EntityId, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(record) = self.state.borrow_mut().entities.get_mut(&entity) {
            record.contacts = tags.into_iter().map(Into::into).collect();
        }
    }

    /// Acceleration applied to every active body, scaled by its gravity
    /// factor on 3D bodies. Zero until set.
    pub fn set_gravity(&self, gravity: Vec3) {
        self.state.borrow_mut().gravity = gravity;
    }

    // Input

    pub fn press_key(&self, key: KeyCode) {
        let mut state = self.state.borrow_mut();
        state.input.keys_down.insert(key);
        state.input.keys_released.remove(&key);
    }

    /// Release `key`. It reads as released until [`end_frame`](Self::end_frame).
    pub fn release_key(&self, key: KeyCode) {
        let mut state = self.state.borrow_mut();
        if state.input.keys_down.remove(&key) {
            state.input.keys_released.insert(key);
        }
    }

    pub fn set_mouse_button(&self, button: MouseCode, down: bool) {
        let mut state = self.state.borrow_mut();
        if down {
            state.input.buttons_down.insert(button);
        } else {
            state.input.buttons_down.remove(&button);
        }
    }

    /// Move the cursor by `delta`, accumulating into this frame's delta.
    pub fn move_mouse(&self, delta: Vec2) {
        let mut state = self.state.borrow_mut();
        state.input.mouse_position += delta;
        state.input.mouse_delta += delta;
    }

    pub fn set_focusing(&self, focusing: bool) {
        self.state.borrow_mut().focusing = focusing;
    }

    #[must_use]
    pub fn is_mouse_locked(&self) -> bool {
        self.state.borrow().input.mouse_locked
    }

    // Frame

    /// Integrate body velocities and consume accumulated forces.
    pub fn step(&self, dt: f32) {
        let mut state = self.state.borrow_mut();
        let gravity = state.gravity;
        for record in state.entities.values_mut() {
            record.step(dt, gravity);
        }
    }

    /// Clear per-frame state: released keys, the mouse delta and the
    /// command log.
    pub fn end_frame(&self) {
        let mut state = self.state.borrow_mut();
        state.input.keys_released.clear();
        state.input.mouse_delta = Vec2::ZERO;
        state.commands.clear();
    }

    // Inspection

    /// Commands applied since the last [`end_frame`](Self::end_frame),
    /// oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<(EntityId, Command)> {
        self.state.borrow().commands.clone()
    }

    /// Commands applied over the engine's whole life.
    #[must_use]
    pub fn command_count(&self) -> u64 {
        self.state.borrow().commands_applied
    }

    pub fn take_commands(&self) -> Vec<(EntityId, Command)> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    #[must_use]
    pub fn pose(&self, entity: EntityId) -> Option<Pose> {
        self.state.borrow().entities.get(&entity).map(|r| r.pose)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.state.borrow().entities.len()
    }

    /// Live entity ids in creation order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.state.borrow().entities.keys().copied().collect()
    }

    #[must_use]
    pub fn name_of(&self, entity: EntityId) -> Option<String> {
        self.state
            .borrow()
            .entities
            .get(&entity)
            .map(|r| r.name.clone())
    }

    #[must_use]
    pub fn components_of(&self, entity: EntityId) -> Vec<ComponentTypeId> {
        self.state
            .borrow()
            .entities
            .get(&entity)
            .map(|r| r.components.iter().copied().collect())
            .unwrap_or_default()
    }

    /// How many times `component` was attached to `entity`.
    #[must_use]
    pub fn attach_count(&self, entity: EntityId, component: ComponentTypeId) -> usize {
        self.state
            .borrow()
            .entities
            .get(&entity)
            .and_then(|r| r.attach_counts.get(&component).copied())
            .unwrap_or(0)
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeCalls for MemoryEngine {
    fn is_alive(&self, entity: EntityId) -> bool {
        self.state.borrow().entities.contains_key(&entity)
    }

    fn has_component(&self, entity: EntityId, component: ComponentTypeId) -> bool {
        self.state
            .borrow()
            .entities
            .get(&entity)
            .is_some_and(|r| r.has(component))
    }

    fn add_component(&self, entity: EntityId, component: ComponentTypeId) {
        if !self.attach(entity, component) {
            debug!(%entity, ?component, "add_component on dead entity ignored");
        }
    }

    fn find_entity_by_name(&self, name: &str) -> EntityId {
        self.state
            .borrow()
            .entities
            .iter()
            .find(|(_, r)| r.name == name)
            .map_or(EntityId::INVALID, |(id, _)| *id)
    }

    fn instantiate(&self, prefab: EntityId, translation: Vec3) -> EntityId {
        let mut state = self.state.borrow_mut();
        let Some(source) = state.entities.get(&prefab) else {
            debug!(%prefab, "instantiate from dead entity");
            return EntityId::INVALID;
        };
        let mut copy = source.clone();
        copy.pose.translation = translation;
        copy.attach_counts = copy.components.iter().map(|c| (*c, 1)).collect();
        copy.contacts.clear();
        let id = state.allocator.allocate();
        debug!(%prefab, %id, "instantiated entity");
        state.entities.insert(id, copy);
        id
    }

    fn destroy(&self, entity: EntityId) {
        if self.state.borrow_mut().entities.remove(&entity).is_some() {
            debug!(%entity, "destroyed entity");
        }
    }

    fn get_property(&self, entity: EntityId, property: Property) -> Option<Value> {
        let state = self.state.borrow();
        let record = state.entities.get(&entity)?;
        if let Some(component) = property.component() {
            if !record.has(component) {
                return None;
            }
        }
        record.read(property)
    }

    fn set_property(&self, entity: EntityId, property: Property, value: Value) {
        if property.is_read_only() {
            warn!(%entity, ?property, "write to read-only property ignored");
            return;
        }
        if value.kind() != property.kind() {
            warn!(
                %entity,
                ?property,
                expected = ?property.kind(),
                got = ?value.kind(),
                "property kind mismatch"
            );
            return;
        }
        let mut state = self.state.borrow_mut();
        let Some(record) = state.entities.get_mut(&entity) else {
            return;
        };
        if property.component().is_some_and(|c| !record.has(c)) {
            trace!(%entity, ?property, "write to missing component ignored");
            return;
        }
        record.write(property, value);
    }

    fn invoke(&self, entity: EntityId, command: Command) {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.entities.get_mut(&entity) else {
            trace!(%entity, ?command, "command on dead entity dropped");
            return;
        };
        if !record.has(command.component()) {
            debug!(%entity, ?command, "command on missing component dropped");
            return;
        }
        trace!(%entity, ?command, "command");
        record.apply(&command);
        state.commands.push((entity, command));
        state.commands_applied += 1;
    }

    fn query(&self, entity: EntityId, query: &Query) -> Option<Value> {
        let state = self.state.borrow();
        let record = state.entities.get(&entity)?;
        if !record.has(query.component()) {
            return None;
        }
        let value = record.answer(query)?;
        if value.kind() != query.kind() {
            warn!(%entity, ?query, got = ?value.kind(), "query answered with the wrong kind");
            return None;
        }
        Some(value)
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.state.borrow().input.keys_down.contains(&key)
    }

    fn is_key_released(&self, key: KeyCode) -> bool {
        self.state.borrow().input.keys_released.contains(&key)
    }

    fn is_mouse_down(&self, button: MouseCode) -> bool {
        self.state.borrow().input.buttons_down.contains(&button)
    }

    fn is_mouse_up(&self, button: MouseCode) -> bool {
        !self.is_mouse_down(button)
    }

    fn mouse_position(&self) -> Vec2 {
        self.state.borrow().input.mouse_position
    }

    fn set_mouse_position(&self, position: Vec2) {
        self.state.borrow_mut().input.mouse_position = position;
    }

    fn mouse_delta(&self) -> Vec2 {
        self.state.borrow().input.mouse_delta
    }

    fn is_mouse_dragging(&self) -> bool {
        let state = self.state.borrow();
        state.input.buttons_down.contains(&MouseCode::ButtonLeft)
            && state.input.mouse_delta != Vec2::ZERO
    }

    fn is_mouse_hidden(&self) -> bool {
        self.state.borrow().input.mouse_hidden
    }

    fn set_mouse_hidden(&self, hidden: bool) {
        self.state.borrow_mut().input.mouse_hidden = hidden;
    }

    fn toggle_mouse_lock(&self) {
        let mut state = self.state.borrow_mut();
        state.input.mouse_locked = !state.input.mouse_locked;
        state.input.mouse_hidden = state.input.mouse_locked;
    }

    fn is_focusing(&self) -> bool {
        self.state.borrow().focusing
    }
}
