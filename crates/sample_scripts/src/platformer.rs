//! Side-scrolling player: walk, double jump with a cooldown, land on floors.

use script_core::components::{Rigidbody2D, SpriteAnimation, SpriteRenderer2D};
use script_core::{KeyCode, Script, ScriptContext};
use script_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerPlayer {
    /// Horizontal speed in units per second.
    pub speed: f32,
    /// Impulse of the first jump; the n-th jump in the air gets `n` times it.
    pub jump_height: f32,
    /// Seconds before another jump is accepted.
    pub jump_interval: f32,
    pub max_jumps: u32,
    /// No jumping above this height.
    pub jump_ceiling: f32,
    /// Contact tags that count as standing on the ground.
    pub floor_tags: Vec<String>,

    #[serde(skip)]
    jump_cooldown: f32,
    #[serde(skip)]
    jump_count: u32,
    #[serde(skip)]
    can_jump: bool,
}

impl Default for PlatformerPlayer {
    fn default() -> Self {
        Self {
            speed: 3.0,
            jump_height: 3.5,
            jump_interval: 0.5,
            max_jumps: 2,
            jump_ceiling: 3.5,
            floor_tags: vec!["Floor".to_owned(), "Long Floor".to_owned()],
            jump_cooldown: 0.0,
            jump_count: 0,
            can_jump: true,
        }
    }
}

impl PlatformerPlayer {
    #[must_use]
    pub fn jump_count(&self) -> u32 {
        self.jump_count
    }

    /// Give back every air jump, as if the player had landed.
    pub fn bounce(&mut self) {
        self.land();
    }

    fn land(&mut self) {
        self.can_jump = true;
        self.jump_count = 0;
        self.jump_cooldown = self.jump_interval;
    }
}

impl Script for PlatformerPlayer {
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        self.jump_cooldown = self.jump_interval;
        self.jump_count = 0;
        self.can_jump = true;

        let entity = ctx.entity();
        entity.get_or_add_component::<Rigidbody2D>();
        entity.get_or_add_component::<SpriteRenderer2D>();
        entity.get_or_add_component::<SpriteAnimation>();
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let entity = ctx.entity();
        let input = ctx.input();
        let (Some(body), Some(sprite), Some(anim)) = (
            entity.get_component::<Rigidbody2D>(),
            entity.get_component::<SpriteRenderer2D>(),
            entity.get_component::<SpriteAnimation>(),
        ) else {
            return;
        };

        let mut state = "Idle";
        let mut walk = 0.0;
        if input.is_key_pressed(KeyCode::A) {
            state = "Walk";
            sprite.flip_x().set(true);
            walk -= self.speed;
        } else if input.is_key_pressed(KeyCode::D) {
            state = "Walk";
            sprite.flip_x().set(false);
            walk += self.speed;
        }
        anim.play_state(state);

        let below_ceiling = entity.translation().get().y < self.jump_ceiling;
        if input.is_key_pressed(KeyCode::Space)
            && below_ceiling
            && self.can_jump
            && self.jump_count < self.max_jumps
        {
            self.jump_cooldown = self.jump_interval;
            self.jump_count += 1;
            self.can_jump = false;
            let impulse = self.jump_height * self.jump_count as f32;
            body.apply_linear_impulse_to_center(Vec2::new(0.0, impulse), false);
            debug!(entity = %entity, jump = self.jump_count, impulse, "jump");
        }

        if !self.can_jump {
            self.jump_cooldown -= dt;
            if self.jump_cooldown <= 0.0 {
                self.can_jump = true;
            }
        }

        if self
            .floor_tags
            .iter()
            .any(|tag| body.is_contact_with_tag(tag))
        {
            self.land();
        }

        body.velocity().update(|v| Vec2::new(walk, v.y));
    }
}

#[cfg(test)]
mod tests {
    use script_core::{Command, MemoryEngine};
    use script_runtime::ScriptHost;

    use super::*;

    fn setup() -> (MemoryEngine, ScriptHost, script_core::EntityId) {
        let engine = MemoryEngine::new();
        let id = engine.spawn("Player");
        let mut host = ScriptHost::new();
        host.attach(id, "PlatformerPlayer", Box::new(PlatformerPlayer::default()))
            .unwrap();
        (engine, host, id)
    }

    fn jumps(engine: &MemoryEngine) -> Vec<Vec2> {
        engine
            .commands()
            .into_iter()
            .filter_map(|(_, command)| match command {
                Command::ApplyLinearImpulseToCenter { impulse, .. } => Some(impulse),
                _ => None,
            })
            .collect()
    }

    fn velocity(engine: &MemoryEngine, host: &ScriptHost, id: script_core::EntityId) -> Vec2 {
        host.scene(engine)
            .entity(id)
            .get_component::<Rigidbody2D>()
            .unwrap()
            .velocity()
            .get()
    }

    #[test]
    fn test_walk_sets_velocity_and_animation() {
        let (engine, mut host, id) = setup();
        engine.press_key(KeyCode::A);
        host.update(&engine, 0.1);

        assert_eq!(velocity(&engine, &host, id), Vec2::new(-3.0, 0.0));
        {
            let player = host.scene(&engine).entity(id);
            assert!(player.get_component::<SpriteRenderer2D>().unwrap().flip_x().get());
            assert_eq!(
                player.get_component::<SpriteAnimation>().unwrap().active_state().get(),
                "Walk"
            );
        }

        engine.release_key(KeyCode::A);
        host.update(&engine, 0.1);
        assert_eq!(velocity(&engine, &host, id), Vec2::ZERO);
        let player = host.scene(&engine).entity(id);
        assert_eq!(
            player.get_component::<SpriteAnimation>().unwrap().active_state().get(),
            "Idle"
        );
    }

    #[test]
    fn test_double_jump_respects_cooldown() {
        let (engine, mut host, id) = setup();
        engine.press_key(KeyCode::Space);

        host.update(&engine, 0.25);
        assert_eq!(jumps(&engine), vec![Vec2::new(0.0, 3.5)]);

        // Cooldown runs out at the end of this frame.
        host.update(&engine, 0.25);
        assert_eq!(jumps(&engine).len(), 1);

        host.update(&engine, 0.25);
        assert_eq!(jumps(&engine), vec![Vec2::new(0.0, 3.5), Vec2::new(0.0, 7.0)]);

        // Out of air jumps.
        host.update(&engine, 0.25);
        host.update(&engine, 0.25);
        host.update(&engine, 0.25);
        assert_eq!(jumps(&engine).len(), 2);
        assert_eq!(velocity(&engine, &host, id), Vec2::new(0.0, 10.5));
    }

    #[test]
    fn test_landing_resets_jumps() {
        let (engine, mut host, id) = setup();
        engine.press_key(KeyCode::Space);
        host.update(&engine, 0.25);
        host.update(&engine, 0.25);
        host.update(&engine, 0.25);
        assert_eq!(jumps(&engine).len(), 2);

        engine.set_contacts(id, ["Long Floor"]);
        host.update(&engine, 0.25);
        engine.set_contacts(id, Vec::<String>::new());
        host.update(&engine, 0.25);
        assert_eq!(jumps(&engine).len(), 3);
        assert_eq!(jumps(&engine)[2], Vec2::new(0.0, 3.5));
    }

    #[test]
    fn test_no_jump_above_ceiling() {
        let (engine, mut host, id) = setup();
        host.update(&engine, 0.1);
        host.scene(&engine)
            .entity(id)
            .translation()
            .set(script_math::Vec3::new(0.0, 4.0, 0.0));

        engine.press_key(KeyCode::Space);
        host.update(&engine, 0.1);
        assert!(jumps(&engine).is_empty());
    }
}
