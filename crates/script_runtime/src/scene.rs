//! Scene descriptors: the JSON a runtime starts from.
//!
//! ```json
//! {
//!   "name": "Platformer",
//!   "gravity": [0.0, -9.8, 0.0],
//!   "entities": [
//!     {
//!       "name": "Player",
//!       "pose": { "translation": [0.0, 1.0, 0.0] },
//!       "components": ["Rigidbody2D", "BoxCollider2D"],
//!       "properties": [{ "property": "BoxFriction", "value": { "Float": 0.9 } }],
//!       "contacts": ["Floor"],
//!       "script": { "name": "PlatformerPlayer", "fields": { "jump_impulse": 3.5 } }
//!     }
//!   ]
//! }
//! ```
//!
//! Prefabs are ordinary entities that scripts look up by name and clone.

use std::path::Path;

use script_core::{ComponentTypeId, EntityId, MemoryEngine, NativeCalls, Property, Value};
use script_math::{Pose, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RuntimeError};
use crate::host::ScriptHost;
use crate::registry::ScriptRegistry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescriptor {
    pub name: String,
    /// Acceleration applied to active bodies.
    pub gravity: Vec3,
    pub entities: Vec<EntityDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(default)]
    pub pose: Pose,
    /// Component names beyond the implicit `Transform`.
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyInit>,
    /// Tags this entity's 2D body starts out touching.
    #[serde(default)]
    pub contacts: Vec<String>,
    #[serde(default)]
    pub script: Option<ScriptDescriptor>,
}

/// Initial value of one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInit {
    pub property: Property,
    pub value: Value,
}

/// A registered script name and the JSON its fields are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

impl SceneDescriptor {
    /// # Errors
    ///
    /// I/O or JSON failures, with the offending path.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RuntimeError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Create every entity in `engine` and attach scripts to `host`.
    ///
    /// Entities are created in file order, so earlier entries get lower ids
    /// and their scripts update first. Returns the new ids in the same order.
    ///
    /// # Errors
    ///
    /// Unknown component or script names, property kind mismatches, invalid
    /// script fields. Entities created before the failing one stay in the
    /// engine.
    pub fn spawn_into(
        &self,
        engine: &MemoryEngine,
        registry: &ScriptRegistry,
        host: &mut ScriptHost,
    ) -> Result<Vec<EntityId>> {
        engine.set_gravity(self.gravity);

        let mut ids = Vec::with_capacity(self.entities.len());
        for desc in &self.entities {
            ids.push(desc.spawn_into(engine, registry, host)?);
        }

        info!(
            scene = %self.name,
            entities = ids.len(),
            scripts = host.scripts().len(),
            "scene loaded"
        );
        Ok(ids)
    }
}

impl EntityDescriptor {
    fn spawn_into(
        &self,
        engine: &MemoryEngine,
        registry: &ScriptRegistry,
        host: &mut ScriptHost,
    ) -> Result<EntityId> {
        let components = self
            .components
            .iter()
            .map(|name| {
                ComponentTypeId::builtin(name).ok_or_else(|| RuntimeError::UnknownComponent {
                    entity: self.name.clone(),
                    component: name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for init in &self.properties {
            let (expected, got) = (init.property.kind(), init.value.kind());
            if expected != got {
                return Err(RuntimeError::PropertyKind {
                    entity: self.name.clone(),
                    property: init.property,
                    expected,
                    got,
                });
            }
        }

        let script = match &self.script {
            Some(desc) => Some((
                desc.name.as_str(),
                registry.create(&desc.name, desc.fields.clone())?,
            )),
            None => None,
        };

        let id = engine.spawn_with_pose(&self.name, self.pose);
        for component in components {
            engine.add_component(id, component);
        }
        for init in &self.properties {
            engine.set_property(id, init.property, init.value.clone());
        }
        if !self.contacts.is_empty() {
            engine.set_contacts(id, self.contacts.iter().cloned());
        }
        if let Some((name, script)) = script {
            host.attach(id, name, script)?;
        }

        debug!(%id, name = %self.name, "spawned scene entity");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use script_core::{Script, ScriptContext};
    use serde_json::json;

    use super::*;

    #[derive(Default, Deserialize)]
    #[serde(default)]
    struct Spin {
        rate: f32,
    }

    impl Script for Spin {}

    fn registry() -> ScriptRegistry {
        let mut registry = ScriptRegistry::new();
        registry.register::<Spin>("Spin").unwrap();
        registry
    }

    fn parse(value: serde_json::Value) -> SceneDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_spawn_scene() {
        let scene = parse(json!({
            "name": "Test",
            "entities": [
                {
                    "name": "Player",
                    "pose": { "translation": [1.0, 2.0, 0.0] },
                    "components": ["Rigidbody2D", "BoxCollider2D"],
                    "properties": [
                        { "property": "BoxFriction", "value": { "Float": 0.9 } },
                        { "property": "Visible", "value": { "Bool": false } }
                    ],
                    "contacts": ["Floor"],
                    "script": { "name": "Spin", "fields": { "rate": 2.0 } }
                },
                { "name": "Floor" }
            ]
        }));

        let engine = MemoryEngine::new();
        let mut host = ScriptHost::new();
        let ids = scene.spawn_into(&engine, &registry(), &mut host).unwrap();
        assert_eq!(ids.len(), 2);

        let player = ids[0];
        assert_eq!(engine.pose(player).map(|p| p.translation), Some(Vec3::new(1.0, 2.0, 0.0)));
        assert!(engine.has_component(player, ComponentTypeId::RIGIDBODY_2D));
        assert_eq!(
            engine.get_property(player, Property::BoxFriction),
            Some(Value::Float(0.9))
        );
        assert_eq!(engine.get_property(player, Property::Visible), Some(Value::Bool(false)));
        assert_eq!(
            engine.query(player, &script_core::Query::ContactTag),
            Some(Value::Text("Floor".into()))
        );
        let entry = host.scripts().get(player).unwrap();
        assert_eq!(entry.type_name(), "Spin");
        let instance = entry.instance().borrow();
        let spin = (**instance).as_any().downcast_ref::<Spin>().unwrap();
        assert_eq!(spin.rate, 2.0);
        assert!(!host.scripts().contains(ids[1]));
    }

    #[test]
    fn test_unknown_component() {
        let scene = parse(json!({
            "entities": [{ "name": "Lamp", "components": ["PointLight"] }]
        }));
        let engine = MemoryEngine::new();
        let err = scene
            .spawn_into(&engine, &registry(), &mut ScriptHost::new())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownComponent { component, .. } if component == "PointLight"));
        assert_eq!(engine.entity_count(), 0);
    }

    #[test]
    fn test_property_kind_mismatch() {
        let scene = parse(json!({
            "entities": [{
                "name": "Player",
                "properties": [{ "property": "Translation", "value": { "Float": 1.0 } }]
            }]
        }));
        let err = scene
            .spawn_into(&MemoryEngine::new(), &registry(), &mut ScriptHost::new())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::PropertyKind { property: Property::Translation, .. }));
    }

    #[test]
    fn test_unknown_script() {
        let scene = parse(json!({
            "entities": [{ "name": "Player", "script": { "name": "Fly" } }]
        }));
        let err = scene
            .spawn_into(&MemoryEngine::new(), &registry(), &mut ScriptHost::new())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownScript(name) if name == "Fly"));
    }

    #[test]
    fn test_scripts_get_context_after_load() {
        #[derive(Default, Deserialize)]
        struct NameCheck {
            #[serde(skip)]
            found: bool,
        }

        impl Script for NameCheck {
            fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
                self.found = ctx.find_entity_by_name("Floor").is_some();
            }
        }

        let mut registry = registry();
        registry.register::<NameCheck>("NameCheck").unwrap();
        let scene = parse(json!({
            "entities": [
                { "name": "Checker", "script": { "name": "NameCheck" } },
                { "name": "Floor" }
            ]
        }));
        let engine = MemoryEngine::new();
        let mut host = ScriptHost::new();
        let ids = scene.spawn_into(&engine, &registry, &mut host).unwrap();
        host.update(&engine, 0.016);

        let entry = host.scripts().get(ids[0]).unwrap();
        let instance = entry.instance().borrow();
        let check = (**instance).as_any().downcast_ref::<NameCheck>().unwrap();
        assert!(check.found);
    }
}
