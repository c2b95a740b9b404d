//! End-to-end: scene JSON, registry, host and frame loop against the
//! in-memory engine.

use script_core::components::{Rigidbody2D, UI};
use script_core::{KeyCode, MemoryEngine, NativeCalls, Script, ScriptContext};
use script_math::{Vec2, Vec3};
use script_runtime::{FrameConfig, FrameLoop, ScriptHost, ScriptRegistry, SceneDescriptor};
use serde::Deserialize;

#[derive(Default, Deserialize)]
#[serde(default)]
struct Hopper {
    impulse: f32,
    #[serde(skip)]
    jumps: u32,
}

impl Script for Hopper {
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, _dt: f32) {
        let Some(body) = ctx.entity().get_component::<Rigidbody2D>() else {
            return;
        };
        if ctx.input().is_key_pressed(KeyCode::Space) && body.is_contact_with_tag("Floor") {
            body.apply_linear_impulse_to_center(Vec2::new(0.0, self.impulse), true);
            self.jumps += 1;
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Hud {
    #[serde(skip)]
    frames: u32,
}

impl Script for Hud {
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, _dt: f32) {
        self.frames += 1;
        let ui = ctx.entity().get_or_add_component::<UI>();
        let jumps = ctx
            .find_entity_by_name("Player")
            .and_then(|player| player.as_script::<Hopper>().map(|hopper| hopper.jumps))
            .unwrap_or_default();
        ui.set_text("Jumps", jumps.to_string());
    }
}

const SCENE: &str = r#"{
    "name": "Hop",
    "entities": [
        {
            "name": "Player",
            "components": ["Rigidbody2D", "BoxCollider2D"],
            "contacts": ["Floor"],
            "script": { "name": "Hopper", "fields": { "impulse": 4.0 } }
        },
        { "name": "Floor", "pose": { "translation": [0.0, -1.0, 0.0] } },
        { "name": "HUD", "script": { "name": "Hud" } }
    ]
}"#;

fn load() -> (MemoryEngine, ScriptHost) {
    let mut registry = ScriptRegistry::new();
    registry.register::<Hopper>("Hopper").unwrap();
    registry.register::<Hud>("Hud").unwrap();

    let scene: SceneDescriptor = serde_json::from_str(SCENE).unwrap();
    let engine = MemoryEngine::new();
    let mut host = ScriptHost::new();
    scene.spawn_into(&engine, &registry, &mut host).unwrap();
    (engine, host)
}

#[test]
fn scene_runs_and_scripts_see_each_other() {
    let (engine, mut host) = load();
    let mut frames = FrameLoop::new(FrameConfig {
        frame_rate: 1000.0,
        max_frames: 3,
    })
    .unwrap();

    engine.press_key(KeyCode::Space);
    frames.run(&mut host, &engine);

    let player = engine.find_entity_by_name("Player");
    let hud = engine.find_entity_by_name("HUD");
    let scene = host.scene(&engine);

    // Entity order: the HUD updates after the player within a frame.
    let label = scene.entity(hud).get_component::<UI>().unwrap().text("Jumps");
    assert_eq!(label, "3");

    let velocity = scene
        .entity(player)
        .get_component::<Rigidbody2D>()
        .unwrap()
        .velocity()
        .get();
    assert_eq!(velocity, Vec2::new(0.0, 12.0));
    assert!(engine.pose(player).unwrap().translation.y > 0.0);
}

#[test]
fn destroyed_player_stops_updating() {
    let (engine, mut host) = load();
    let mut frames = FrameLoop::new(FrameConfig::default()).unwrap();

    frames.tick(&mut host, &engine, 0.016);
    let player = engine.find_entity_by_name("Player");
    host.scene(&engine).entity(player).destroy();

    let stats = frames.tick(&mut host, &engine, 0.016);
    assert_eq!(stats.removed, vec![player]);
    assert_eq!(host.scripts().len(), 1);

    let hud = engine.find_entity_by_name("HUD");
    let label = host
        .scene(&engine)
        .entity(hud)
        .get_component::<UI>()
        .unwrap()
        .text("Jumps");
    assert_eq!(label, "0");
    assert_eq!(engine.pose(hud).unwrap().translation, Vec3::ZERO);
}
