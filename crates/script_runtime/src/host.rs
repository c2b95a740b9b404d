//! Script host: owns script instances and drives their hooks.
//!
//! One call to [`ScriptHost::update`] is one frame:
//!
//! 1. Drop scripts whose entity the engine no longer reports alive.
//! 2. Run `on_create` for every script that has not been created yet.
//! 3. Run `on_update` for every script, in entity id order, skipping
//!    entities destroyed earlier in the same frame.

use std::collections::HashSet;

use script_core::{EntityId, NativeCalls, Scene, Script, ScriptContext, ScriptTable, SharedContext};
use tracing::{debug, warn};

use crate::error::{Result, RuntimeError};

/// What happened during one [`ScriptHost::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    pub created: usize,
    pub updated: usize,
    /// Entities whose scripts were dropped because the entity is gone.
    pub removed: Vec<EntityId>,
}

/// Owner of all script instances and the context they share.
#[derive(Debug, Default)]
pub struct ScriptHost {
    scripts: ScriptTable,
    shared: SharedContext,
    created: HashSet<EntityId>,
    frame: u64,
}

impl ScriptHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `script` to `entity`. Its `on_create` runs at the start of the
    /// next [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateScript`] if the entity already has one.
    pub fn attach(&mut self, entity: EntityId, name: &str, script: Box<dyn Script>) -> Result<()> {
        if let Some(existing) = self.scripts.get(entity) {
            return Err(RuntimeError::DuplicateScript {
                entity,
                existing: existing.type_name().to_owned(),
            });
        }
        debug!(%entity, script = name, "attached script");
        self.scripts.insert(entity, name, script);
        Ok(())
    }

    /// Remove the script of `entity` without running any hook.
    pub fn detach(&mut self, entity: EntityId) -> Option<Box<dyn Script>> {
        self.created.remove(&entity);
        self.scripts.remove(entity)
    }

    #[must_use]
    pub fn scripts(&self) -> &ScriptTable {
        &self.scripts
    }

    #[must_use]
    pub fn shared(&self) -> &SharedContext {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut SharedContext {
        &mut self.shared
    }

    /// Number of frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// A view of the engine and this host's scripts, for code outside a hook.
    #[must_use]
    pub fn scene<'a>(&'a self, native: &'a dyn NativeCalls) -> Scene<'a> {
        Scene::new(native, &self.scripts)
    }

    /// Run one frame of script hooks against `native`.
    pub fn update(&mut self, native: &dyn NativeCalls, dt: f32) -> FrameStats {
        self.frame += 1;
        let mut stats = FrameStats {
            frame: self.frame,
            ..FrameStats::default()
        };

        stats.removed = self.scripts.retain(|id| native.is_alive(id));
        for id in &stats.removed {
            self.created.remove(id);
            debug!(entity = %id, "dropped script of destroyed entity");
        }

        let order = self.scripts.entities();
        let scene = Scene::new(native, &self.scripts);

        for &id in &order {
            if self.created.contains(&id) {
                continue;
            }
            let Some(entry) = self.scripts.get(id) else {
                continue;
            };
            let Ok(mut instance) = entry.instance().try_borrow_mut() else {
                warn!(entity = %id, "script busy, on_create deferred");
                continue;
            };
            let mut ctx = ScriptContext::new(scene.entity(id), &mut self.shared);
            instance.on_create(&mut ctx);
            self.created.insert(id);
            stats.created += 1;
        }

        for &id in &order {
            if !self.created.contains(&id) || !native.is_alive(id) {
                continue;
            }
            let Some(entry) = self.scripts.get(id) else {
                continue;
            };
            let Ok(mut instance) = entry.instance().try_borrow_mut() else {
                warn!(entity = %id, "script busy, update skipped");
                continue;
            };
            let mut ctx = ScriptContext::new(scene.entity(id), &mut self.shared);
            instance.on_update(&mut ctx, dt);
            stats.updated += 1;
        }

        debug!(
            frame = stats.frame,
            created = stats.created,
            updated = stats.updated,
            removed = stats.removed.len(),
            "frame done"
        );
        stats
    }
}
