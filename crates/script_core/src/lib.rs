//! # script_core
//!
//! The binding layer between gameplay scripts and an engine that owns all
//! entity and component state.
//!
//! Scripts never hold engine data. They hold handles:
//!
//! - [`Entity`]: an [`EntityId`] plus the [`Scene`] it lives in.
//! - Component proxies in [`components`]: an entity with a type, whose
//!   fields are [`RemoteProperty`] handles.
//!
//! Every read and write on a handle becomes one call on [`NativeCalls`], the
//! only seam to the engine. [`MemoryEngine`] implements it in memory for
//! tests and headless runs.
//!
//! Behaviour lives in [`Script`] implementations, owned by a
//! [`ScriptTable`] and driven through a [`ScriptContext`].

pub mod command;
pub mod component;
pub mod components;
pub mod entity;
pub mod handle;
pub mod input;
pub mod memory;
pub mod native;
pub mod property;
pub mod scene;
pub mod script;
pub mod shared;
pub mod value;

pub use command::{Command, Query};
pub use component::{Component, ComponentTypeId};
pub use entity::EntityId;
pub use handle::Entity;
pub use input::{Input, KeyCode, MouseCode};
pub use memory::MemoryEngine;
pub use native::NativeCalls;
pub use property::{Property, RemoteProperty};
pub use scene::Scene;
pub use script::{AsAny, Script, ScriptContext, ScriptEntry, ScriptTable};
pub use shared::SharedContext;
pub use value::{PropertyValue, Value, ValueKind};
