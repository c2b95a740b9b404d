//! First-person player with mouse look, a bullet gun and a jetpack-style
//! jump.

use script_core::components::{Audio, Rigidbody, Transform, UI};
use script_core::{Entity, EntityId, KeyCode, MouseCode, Scene, Script, ScriptContext};
use script_math::{Vec2, Vec3, VectorExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct Bullet {
    entity: EntityId,
    remaining: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterPlayer {
    pub speed: f32,
    /// Prefab cloned for every shot.
    pub bullet: Option<String>,
    /// Camera entity pitched by vertical mouse movement.
    pub camera: Option<String>,
    /// Entity with an `Audio` component played on every shot.
    pub shoot_audio: Option<String>,
    /// Entity with a `UI` holding the `FPSCounter` and `BulletCount` labels.
    pub ui: Option<String>,
    /// Seconds between shots while the left button is held.
    pub fire_rate: f32,
    pub bullet_speed: f32,
    /// Seconds a bullet lives before it is destroyed.
    pub bullet_lifetime: f32,
    /// Seconds between two jumps.
    pub jump_rate: f32,
    pub jump_velocity: f32,
    /// Forward thrust applied every frame the jump key is held.
    pub jump_thrust: f32,
    pub look_sensitivity: f32,
    pub pitch_sensitivity: f32,
    /// Camera pitch range in radians.
    pub pitch_limits: Vec2,
    /// Seconds between FPS counter refreshes.
    pub ui_refresh_rate: f32,

    #[serde(skip)]
    yaw: f32,
    #[serde(skip)]
    pitch: f32,
    #[serde(skip)]
    fire_cooldown: f32,
    #[serde(skip)]
    jump_cooldown: f32,
    #[serde(skip)]
    ui_refresh: f32,
    #[serde(skip)]
    bullets: Vec<Bullet>,
    #[serde(skip)]
    bullet_count: u32,
    #[serde(skip)]
    bullet_id: Option<EntityId>,
    #[serde(skip)]
    camera_id: Option<EntityId>,
    #[serde(skip)]
    audio_id: Option<EntityId>,
    #[serde(skip)]
    ui_id: Option<EntityId>,
}

impl Default for ShooterPlayer {
    fn default() -> Self {
        Self {
            speed: 5.0,
            bullet: Some("Bullet".to_owned()),
            camera: Some("Camera".to_owned()),
            shoot_audio: None,
            ui: None,
            fire_rate: 0.05,
            bullet_speed: 30.0,
            bullet_lifetime: 3.0,
            jump_rate: 1.0,
            jump_velocity: 10.0,
            jump_thrust: 500.0,
            look_sensitivity: 0.1,
            pitch_sensitivity: 0.05,
            pitch_limits: Vec2::new(-0.5, 1.8),
            ui_refresh_rate: 1.0,
            yaw: 0.0,
            pitch: -0.2,
            fire_cooldown: 0.0,
            jump_cooldown: 0.0,
            ui_refresh: 0.0,
            bullets: Vec::new(),
            bullet_count: 0,
            bullet_id: None,
            camera_id: None,
            audio_id: None,
            ui_id: None,
        }
    }
}

fn resolve(ctx: &ScriptContext<'_>, name: Option<&str>, role: &str) -> Option<EntityId> {
    let name = name?;
    let found = ctx.find_entity_by_name(name).map(|entity| entity.id());
    if found.is_none() {
        warn!(%role, %name, "shooter reference not found");
    }
    found
}

impl ShooterPlayer {
    /// Shots fired since creation.
    #[must_use]
    pub fn bullet_count(&self) -> u32 {
        self.bullet_count
    }

    /// Bullets still in flight.
    #[must_use]
    pub fn live_bullets(&self) -> usize {
        self.bullets.len()
    }

    fn live(scene: Scene<'_>, id: Option<EntityId>) -> Option<Entity<'_>> {
        id.map(|id| scene.entity(id)).filter(|entity| entity.is_alive())
    }

    fn look(&mut self, ctx: &ScriptContext<'_>, body: Rigidbody<'_>, dt: f32) {
        let scene = ctx.scene();
        if scene.is_focusing() {
            let delta = ctx.input().mouse_delta();
            self.yaw -= delta.x * dt * self.look_sensitivity;
            self.pitch = (self.pitch - delta.y * dt * self.pitch_sensitivity)
                .clamp(self.pitch_limits.x, self.pitch_limits.y);

            if let Some(camera) = Self::live(scene, self.camera_id) {
                let euler = camera.get_or_add_component::<Transform>().euler_angles();
                euler.update(|angles| Vec3::new(self.pitch, angles.y, 0.0));
            }
        }
        body.set_euler_angles(Vec3::new(0.0, self.yaw, 0.0), true);
    }

    fn shoot(&mut self, ctx: &ScriptContext<'_>, forward: Vec3) {
        let scene = ctx.scene();
        let Some(prefab) = Self::live(scene, self.bullet_id) else {
            return;
        };
        let origin = ctx.entity().translation().get() + Vec3::Y * 2.0;
        let Some(bullet) = prefab.instantiate(origin) else {
            return;
        };

        let mut velocity = forward * self.bullet_speed;
        velocity.y += 5.0;
        bullet
            .get_or_add_component::<Rigidbody>()
            .add_linear_velocity(velocity);
        self.bullets.push(Bullet {
            entity: bullet.id(),
            remaining: self.bullet_lifetime,
        });
        self.fire_cooldown = self.fire_rate;
        self.bullet_count += 1;

        if let Some(audio) = Self::live(scene, self.audio_id) {
            audio.get_or_add_component::<Audio>().play_overlapping();
        }
        debug!(bullet = %bullet, count = self.bullet_count, "shot fired");
    }

    fn expire_bullets(&mut self, scene: Scene<'_>, dt: f32) {
        self.bullets.retain_mut(|bullet| {
            bullet.remaining -= dt;
            if bullet.remaining > 0.0 {
                return true;
            }
            scene.entity(bullet.entity).destroy();
            false
        });
    }

    fn refresh_ui(&mut self, scene: Scene<'_>, dt: f32) {
        let Some(ui) = Self::live(scene, self.ui_id) else {
            return;
        };
        let ui = ui.get_or_add_component::<UI>();
        self.ui_refresh -= dt;
        if self.ui_refresh <= 0.0 && dt > 0.0 {
            ui.set_text("FPSCounter", format!("{:.2} FPS", 1.0 / dt));
            self.ui_refresh = self.ui_refresh_rate;
        }
        ui.set_text("BulletCount", format!("{} Total bullets", self.bullet_count));
    }
}

impl Script for ShooterPlayer {
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        self.fire_cooldown = self.fire_rate;
        self.jump_cooldown = 0.0;
        self.ui_refresh = 0.0;
        self.bullets.clear();
        self.bullet_count = 0;

        self.bullet_id = resolve(ctx, self.bullet.as_deref(), "bullet");
        self.camera_id = resolve(ctx, self.camera.as_deref(), "camera");
        self.audio_id = resolve(ctx, self.shoot_audio.as_deref(), "shoot_audio");
        self.ui_id = resolve(ctx, self.ui.as_deref(), "ui");

        ctx.entity().get_or_add_component::<Rigidbody>();
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let entity = ctx.entity();
        let Some(body) = entity.get_component::<Rigidbody>() else {
            return;
        };
        let input = ctx.input();
        self.fire_cooldown -= dt;
        self.jump_cooldown -= dt;

        self.look(ctx, body, dt);

        let forward = entity.forward().normalized();
        let right = entity.right().normalized();
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

        if input.is_mouse_down(MouseCode::ButtonLeft) && self.fire_cooldown <= 0.0 {
            self.shoot(ctx, forward);
        }
        self.expire_bullets(ctx.scene(), dt);

        let jumping = input.is_key_pressed(KeyCode::Space);
        if jumping && self.jump_cooldown <= 0.0 {
            body.add_linear_velocity(Vec3::Y * self.jump_velocity);
            self.jump_cooldown = self.jump_rate;
        }
        body.linear_velocity()
            .update(|v| Vec3::new(velocity.x, v.y, velocity.z));
        if jumping {
            body.add_force(forward * self.jump_thrust);
        }

        self.refresh_ui(ctx.scene(), dt);
    }
}
