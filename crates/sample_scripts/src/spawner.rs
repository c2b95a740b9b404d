//! Drops a grid of blocks one at a time, then clears them one at a time.

use script_core::components::{Rigidbody, UI};
use script_core::{EntityId, Script, ScriptContext};
use script_math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Spawning,
    Clearing,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSpawner {
    /// Prefab used for even spawns.
    pub block: String,
    /// Prefab used for odd spawns.
    pub block_b: String,
    /// Entity with a UI showing the live block count; optional.
    pub ui: Option<String>,
    /// The grid is `2 * size` by `2 * size` spawn points.
    pub size: i32,
    /// Seconds between two spawns or two removals.
    pub spawn_interval: f32,

    #[serde(skip)]
    positions: Vec<Vec3>,
    #[serde(skip)]
    spawned: Vec<EntityId>,
    #[serde(skip)]
    next: usize,
    #[serde(skip)]
    timer: f32,
    #[serde(skip)]
    phase: Phase,
}

impl Default for BlockSpawner {
    fn default() -> Self {
        Self {
            block: "Block".to_owned(),
            block_b: "BlockB".to_owned(),
            ui: None,
            size: 15,
            spawn_interval: 0.05,
            positions: Vec::new(),
            spawned: Vec::new(),
            next: 0,
            timer: 0.0,
            phase: Phase::Spawning,
        }
    }
}

impl BlockSpawner {
    /// Blocks currently alive.
    #[must_use]
    pub fn total(&self) -> usize {
        self.spawned.len()
    }

    /// Spawn points on a wobbling column, higher for larger `x`.
    fn grid(size: i32) -> Vec<Vec3> {
        let size = size.max(0);
        let mut positions = Vec::with_capacity((4 * size * size) as usize);
        for x in -size..size {
            for z in -size..size {
                let (x, z) = (x as f32, z as f32);
                let height = size as f32 * 5.0 + x;
                positions.push(Vec3::new(x.sin() * 2.0, height, z.cos() * 2.0));
            }
        }
        positions
    }

    fn tick(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if self.timer >= self.spawn_interval {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

impl Script for BlockSpawner {
    fn on_create(&mut self, _ctx: &mut ScriptContext<'_>) {
        self.positions = Self::grid(self.size);
        self.spawned.clear();
        self.next = 0;
        self.timer = 0.0;
        self.phase = Phase::Spawning;
        debug!(points = self.positions.len(), "block grid ready");
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        match self.phase {
            Phase::Spawning => {
                if self.next >= self.positions.len() {
                    self.phase = Phase::Clearing;
                } else if self.tick(dt) {
                    let name = if self.next % 2 == 0 { &self.block } else { &self.block_b };
                    let position = self.positions[self.next];
                    match ctx
                        .find_entity_by_name(name)
                        .and_then(|prefab| prefab.instantiate(position))
                    {
                        Some(block) => {
                            block
                                .get_or_add_component::<Rigidbody>()
                                .set_position(position, true);
                            self.spawned.push(block.id());
                        }
                        None => warn!(prefab = %name, "block prefab missing, skipping spawn point"),
                    }
                    self.next += 1;
                    if self.next == self.positions.len() {
                        info!(blocks = self.spawned.len(), "all blocks spawned");
                        self.phase = Phase::Clearing;
                    }
                }
            }
            Phase::Clearing => {
                if self.spawned.is_empty() {
                    info!("all blocks cleared");
                    self.phase = Phase::Done;
                } else if self.tick(dt) {
                    let id = self.spawned.remove(0);
                    ctx.scene().entity(id).destroy();
                }
            }
            Phase::Done => {}
        }

        if let Some(ui) = self
            .ui
            .as_deref()
            .and_then(|name| ctx.find_entity_by_name(name))
        {
            ui.get_or_add_component::<UI>()
                .set_text("CubeCount", format!("{} Total Cubes", self.spawned.len()));
        }
    }
}
