//! 2D follow camera with a dead zone.

use script_core::{EntityId, Script, ScriptContext};
use script_math::{Vec2, Vec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Keeps a target inside a square zone around the camera, catching up
/// proportionally to how far the target left the zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFollow {
    /// Name of the entity to follow.
    pub target: String,
    /// Half extent of the dead zone.
    pub zone_size: f32,
    /// How far above the target the camera rests.
    pub y_offset: f32,
    /// Horizontal catch-up rate per unit of distance outside the zone.
    pub follow_rate: f32,
    /// Multiplier on vertical speed once the target is over a unit away.
    pub vertical_boost: f32,

    #[serde(skip)]
    target_id: Option<EntityId>,
    #[serde(skip)]
    position: Vec2,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            target: "Player".to_owned(),
            zone_size: 1.2,
            y_offset: 1.0,
            follow_rate: 3.0,
            vertical_boost: 5.0,
            target_id: None,
            position: Vec2::ZERO,
        }
    }
}

impl Script for CameraFollow {
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        match ctx.find_entity_by_name(&self.target) {
            Some(target) => {
                let t = target.translation().get();
                self.position = Vec2::new(t.x, t.y + self.y_offset);
                self.target_id = Some(target.id());
            }
            None => warn!(target = %self.target, "camera target not found"),
        }
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let Some(target) = self.target_id.map(|id| ctx.scene().entity(id)) else {
            return;
        };
        if !target.is_alive() {
            self.target_id = None;
            return;
        }

        let camera = ctx.entity().translation();
        let current = camera.get();
        let min = current.xy() - Vec2::splat(self.zone_size);
        let max = current.xy() + Vec2::splat(self.zone_size);
        let p = target.translation().get().xy();

        if p.x < min.x {
            self.position.x -= self.follow_rate * (min.x - p.x) * dt;
        } else if p.x > max.x {
            self.position.x += self.follow_rate * (p.x - max.x) * dt;
        }

        let mut y_speed = p.y - current.y;
        if y_speed.abs() > 1.0 {
            y_speed *= self.vertical_boost;
        }
        if p.y > max.y || p.y + self.y_offset < current.y {
            self.position.y += y_speed * dt;
        }

        camera.set(Vec3::new(self.position.x, self.position.y, current.z));
    }
}
