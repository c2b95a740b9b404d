//! # script_runtime
//!
//! Everything around the binding layer that turns scripts into a running
//! program:
//!
//! 1. A [`ScriptRegistry`] maps names to script factories.
//! 2. A [`SceneDescriptor`] creates entities in the engine and attaches
//!    scripts by name.
//! 3. A [`ScriptHost`] owns the script instances and runs their hooks.
//! 4. A [`FrameLoop`] calls the host once per frame and lets the engine
//!    advance.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use script_core::MemoryEngine;
//! use script_runtime::{FrameConfig, FrameLoop, ScriptHost, ScriptRegistry, SceneDescriptor};
//!
//! let engine = MemoryEngine::new();
//! let registry = ScriptRegistry::new();
//! let mut host = ScriptHost::new();
//! let scene = SceneDescriptor::load("scene.json".as_ref()).unwrap();
//! scene.spawn_into(&engine, &registry, &mut host).unwrap();
//!
//! let mut frames = FrameLoop::new(FrameConfig { frame_rate: 60.0, max_frames: 600 }).unwrap();
//! frames.run(&mut host, &engine);
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod registry;
pub mod scene;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use frame::{FrameConfig, FrameDriver, FrameLoop};
pub use host::{FrameStats, ScriptHost};
pub use registry::ScriptRegistry;
pub use scene::{EntityDescriptor, PropertyInit, SceneDescriptor, ScriptDescriptor};
