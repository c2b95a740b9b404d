//! Walking enemy that paces around its spawn point and gets squashed by the
//! player.

use script_core::components::{Rigidbody2D, SpriteAnimation};
use script_core::{Script, ScriptContext};
use script_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::platformer::PlatformerPlayer;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Patrol {
    pub speed: f32,
    /// How far either side of the spawn point to walk.
    pub distance: f32,
    /// Contact tag and entity name of whoever can squash this enemy.
    pub player: String,

    #[serde(skip)]
    direction: f32,
    #[serde(skip)]
    x_center: f32,
    #[serde(skip)]
    min_x: f32,
    #[serde(skip)]
    max_x: f32,
    #[serde(skip)]
    squashed: bool,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            speed: 5.0,
            distance: 2.0,
            player: "Player".to_owned(),
            direction: 1.0,
            x_center: 0.0,
            min_x: 0.0,
            max_x: 0.0,
            squashed: false,
        }
    }
}

impl Patrol {
    #[must_use]
    pub fn is_squashed(&self) -> bool {
        self.squashed
    }
}

impl Script for Patrol {
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        let entity = ctx.entity();
        let x = entity.translation().get().x;
        self.x_center = x;
        self.max_x = x + self.distance;
        self.min_x = x - self.distance;
        self.direction = 1.0;

        entity.get_or_add_component::<Rigidbody2D>();
        entity
            .get_or_add_component::<SpriteAnimation>()
            .play_state("Idle");
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let entity = ctx.entity();
        let (Some(body), Some(anim)) = (
            entity.get_component::<Rigidbody2D>(),
            entity.get_component::<SpriteAnimation>(),
        ) else {
            return;
        };
        if self.squashed {
            return;
        }

        if body.is_contact_with_tag(&self.player) {
            self.squashed = true;
            anim.play_state("Squashed");
            body.velocity().set(Vec2::ZERO);
            if let Some(mut player) = ctx
                .find_entity_by_name(&self.player)
                .and_then(|player| player.as_script::<PlatformerPlayer>())
            {
                player.bounce();
            }
            info!(entity = %entity, "enemy squashed");
            return;
        }

        if self.x_center >= self.max_x {
            self.direction = -1.0;
        } else if self.x_center <= self.min_x {
            self.direction = 1.0;
        }

        let push = self.direction * self.speed * dt;
        body.apply_force_to_center(Vec2::new(push, 0.0), true);
        anim.play_state("Idle");
        self.x_center = entity.translation().get().x;
    }
}
