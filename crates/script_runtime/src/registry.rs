//! Script registry: maps script names to factories.
//!
//! Scenes refer to scripts by name and give their fields as JSON. A factory
//! turns those fields into a boxed [`Script`].

use std::collections::BTreeMap;
use std::fmt;

use script_core::Script;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, RuntimeError};

type Factory = Box<dyn Fn(serde_json::Value) -> Result<Box<dyn Script>, serde_json::Error>>;

/// Named script factories.
#[derive(Default)]
pub struct ScriptRegistry {
    factories: BTreeMap<String, Factory>,
}

impl ScriptRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name`. Its fields are deserialized from the JSON
    /// a scene gives; `null` counts as an empty object, so types with
    /// `#[serde(default)]` can be attached without fields.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateRegistration`] if `name` is taken.
    pub fn register<T>(&mut self, name: &str) -> Result<()>
    where
        T: Script + DeserializeOwned,
    {
        self.register_factory(name, |fields| {
            let fields = match fields {
                serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
                other => other,
            };
            let script: T = serde_json::from_value(fields)?;
            Ok(Box::new(script) as Box<dyn Script>)
        })
    }

    /// Register a custom factory under `name`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateRegistration`] if `name` is taken.
    pub fn register_factory<F>(&mut self, name: &str, factory: F) -> Result<()>
    where
        F: Fn(serde_json::Value) -> Result<Box<dyn Script>, serde_json::Error> + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(RuntimeError::DuplicateRegistration(name.to_owned()));
        }
        debug!(script = name, "registered script");
        self.factories.insert(name.to_owned(), Box::new(factory));
        Ok(())
    }

    /// Build a fresh instance of the script registered as `name`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownScript`] for an unregistered name,
    /// [`RuntimeError::ScriptFields`] when `fields` don't deserialize.
    pub fn create(&self, name: &str, fields: serde_json::Value) -> Result<Box<dyn Script>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownScript(name.to_owned()))?;
        factory(fields).map_err(|source| RuntimeError::ScriptFields {
            name: name.to_owned(),
            source,
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
