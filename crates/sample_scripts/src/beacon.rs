//! Two scripts that share a position through the runtime's shared context.
//!
//! [`Beacon`] circles its spawn point and publishes where it is as a
//! [`BeaconPosition`]; [`Tracker`] chases the latest published position.
//! Neither looks the other up in the scene.

use script_core::{Script, ScriptContext};
use script_math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The beacon's translation as of its last update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BeaconPosition(pub Vec3);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Beacon {
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f32,

    #[serde(skip)]
    center: Vec3,
    #[serde(skip)]
    angle: f32,
}

impl Default for Beacon {
    fn default() -> Self {
        Self {
            radius: 3.0,
            angular_speed: 1.0,
            center: Vec3::ZERO,
            angle: 0.0,
        }
    }
}

impl Script for Beacon {
    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        let position = ctx.entity().translation().get();
        self.center = position;
        self.angle = 0.0;
        ctx.shared_mut().insert(BeaconPosition(position));
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        self.angle += self.angular_speed * dt;
        let offset = Vec3::new(self.angle.cos(), 0.0, self.angle.sin()) * self.radius;
        let position = self.center + offset;
        ctx.entity().translation().set(position);
        ctx.shared_mut().insert(BeaconPosition(position));
        trace!(?position, "beacon moved");
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tracker {
    /// Units per second.
    pub speed: f32,
}

impl Default for Tracker {
    fn default() -> Self {
        Self { speed: 2.0 }
    }
}

impl Script for Tracker {
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let Some(BeaconPosition(target)) = ctx.shared().get::<BeaconPosition>().copied() else {
            return;
        };
        let translation = ctx.entity().translation();
        let current = translation.get();
        let to_target = target - current;
        let step = self.speed * dt;
        if to_target.length() <= step {
            translation.set(target);
        } else {
            translation.set(current + to_target.normalize() * step);
        }
    }
}
