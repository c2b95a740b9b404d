//! # sandbox
//!
//! Loads a scene, attaches the sample scripts and runs them against the
//! in-memory engine for a number of frames.
//!
//! ```text
//! sandbox --scene demos/sandbox/assets/platformer.json --input demos/sandbox/assets/platformer_input.json --frames 240
//! sandbox --config demos/sandbox/assets/sandbox.json
//! ```

mod input;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use script_core::MemoryEngine;
use script_runtime::{FrameLoop, RuntimeConfig, SceneDescriptor, ScriptHost, ScriptRegistry};
use tracing::info;
use tracing_subscriber::EnvFilter;

use input::InputPlan;

#[derive(Parser)]
#[command(name = "sandbox", about = "Run sample scripts against the in-memory engine")]
struct Args {
    /// Runtime config JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene descriptor JSON; overrides the config's scene
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Scripted input events JSON
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Frames to run, 0 to run until ctrl-c
    #[arg(short, long)]
    frames: Option<u64>,

    /// Frames per second
    #[arg(short = 'r', long)]
    frame_rate: Option<f64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(short, long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig {
            log_filter: "sandbox=info,script_runtime=info".to_owned(),
            ..RuntimeConfig::default()
        },
    };
    if let Some(scene) = args.scene {
        config.scene = Some(scene);
    }
    if let Some(frames) = args.frames {
        config.frame.max_frames = frames;
    }
    if let Some(rate) = args.frame_rate {
        config.frame.frame_rate = rate;
    }
    if let Some(filter) = args.log {
        config.log_filter = filter;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();

    let Some(scene_path) = config.scene.clone() else {
        bail!("no scene given; pass --scene or set \"scene\" in the config");
    };
    let scene = SceneDescriptor::load(&scene_path)?;
    info!(path = %scene_path.display(), scene = %scene.name, "loading scene");

    let mut registry = ScriptRegistry::new();
    sample_scripts::register_all(&mut registry)?;

    let engine = MemoryEngine::new();
    let mut host = ScriptHost::new();
    scene
        .spawn_into(&engine, &registry, &mut host)
        .with_context(|| format!("spawning scene {}", scene_path.display()))?;

    let mut plan = match &args.input {
        Some(path) => InputPlan::load(path)?,
        None => InputPlan::default(),
    };
    if plan.is_empty() {
        info!("no scripted input, scripts only see an idle keyboard");
    }

    let mut frames = FrameLoop::new(config.frame.clone())?;
    frames
        .run_async(&mut host, &engine, |frame, engine| plan.apply(frame, engine))
        .await;

    info!(
        frames = frames.frames(),
        entities = engine.entity_count(),
        scripts = host.scripts().len(),
        commands = engine.command_count(),
        "sandbox finished"
    );
    for id in engine.entities() {
        if let (Some(name), Some(pose)) = (engine.name_of(id), engine.pose(id)) {
            info!(%id, %name, translation = ?pose.translation, "entity");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use script_core::NativeCalls;
    use script_runtime::FrameConfig;

    use super::*;

    fn run_asset(scene: &str, input: &str, frames: u64) -> (MemoryEngine, ScriptHost) {
        let scene: SceneDescriptor = serde_json::from_str(scene).unwrap();
        let mut plan = InputPlan::new(serde_json::from_str(input).unwrap());
        let mut registry = ScriptRegistry::new();
        sample_scripts::register_all(&mut registry).unwrap();

        let engine = MemoryEngine::new();
        let mut host = ScriptHost::new();
        scene.spawn_into(&engine, &registry, &mut host).unwrap();

        let mut frame_loop = FrameLoop::new(FrameConfig::default()).unwrap();
        for frame in 1..=frames {
            plan.apply(frame, &engine);
            frame_loop.tick(&mut host, &engine, 1.0 / 60.0);
        }
        (engine, host)
    }

    #[test]
    fn test_platformer_assets_run() {
        let (engine, host) = run_asset(
            include_str!("../assets/platformer.json"),
            include_str!("../assets/platformer_input.json"),
            240,
        );
        assert_eq!(host.scripts().len(), 5);
        let player = engine.find_entity_by_name("Player");
        assert!(engine.pose(player).unwrap().translation.x != 0.0);
    }

    #[test]
    fn test_shooter_assets_run() {
        let (engine, host) = run_asset(
            include_str!("../assets/shooter.json"),
            include_str!("../assets/shooter_input.json"),
            120,
        );
        let hud = engine.find_entity_by_name("HUD");
        let text = host
            .scene(&engine)
            .entity(hud)
            .get_component::<script_core::components::UI>()
            .unwrap()
            .text("BulletCount");
        assert!(text.ends_with("Total bullets"));
        assert_ne!(text, "0 Total bullets");
    }

    #[test]
    fn test_config_asset_parses() {
        let config: RuntimeConfig =
            serde_json::from_str(include_str!("../assets/sandbox.json")).unwrap();
        assert_eq!(config.frame.max_frames, 240);
        assert_eq!(config.scene, Some(PathBuf::from("platformer.json")));
    }
}
