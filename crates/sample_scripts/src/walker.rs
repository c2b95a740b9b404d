//! Third-person walking: WASD relative to where the camera looks.

use script_core::components::Rigidbody;
use script_core::{EntityId, KeyCode, Script, ScriptContext};
use script_math::{Vec3, VectorExt};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Walker {
    pub speed: f32,
    /// Entity whose facing defines forward. Falls back to the walker itself.
    pub camera: String,

    #[serde(skip)]
    camera_id: Option<EntityId>,
}

impl Default for Walker {
    fn default() -> Self {
        Self {
            speed: 5.0,
            camera: "Camera".to_owned(),
            camera_id: None,
        }
    }
}

impl Script for Walker {
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        self.camera_id = ctx.find_entity_by_name(&self.camera).map(|e| e.id());
        if self.camera_id.is_none() {
            warn!(camera = %self.camera, "walker camera not found, using own facing");
        }
        ctx.entity().get_or_add_component::<Rigidbody>();
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, _dt: f32) {
        let entity = ctx.entity();
        let Some(body) = entity.get_component::<Rigidbody>() else {
            return;
        };
        let view = self
            .camera_id
            .map(|id| ctx.scene().entity(id))
            .filter(|camera| camera.is_alive())
            .unwrap_or(entity);

        let forward = view.forward().normalized();
        let right = view.right().normalized();
        let input = ctx.input();
        let mut velocity = Vec3::ZERO;
        if input.is_key_pressed(KeyCode::A) {
            velocity -= right * self.speed;
        } else if input.is_key_pressed(KeyCode::D) {
            velocity += right * self.speed;
        }
        if input.is_key_pressed(KeyCode::W) {
            velocity += forward * self.speed;
        } else if input.is_key_pressed(KeyCode::S) {
            velocity -= forward * self.speed;
        }

        body.linear_velocity()
            .update(|v| Vec3::new(velocity.x, v.y, velocity.z));
    }
}
