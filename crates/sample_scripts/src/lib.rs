//! # sample_scripts
//!
//! Gameplay scripts built on `script_core`, ready to be attached from a
//! scene by name once [`register_all`] has run.
//!
//! | Name               | Does                                                  |
//! |--------------------|-------------------------------------------------------|
//! | `PlatformerPlayer` | 2D walking and double jumping                         |
//! | `CameraFollow`     | 2D camera with a dead zone around its target          |
//! | `Patrol`           | enemy pacing around its spawn point, squashable       |
//! | `BlockSpawner`     | drops a grid of blocks, then clears them              |
//! | `ShooterPlayer`    | first-person movement, mouse look and shooting        |
//! | `Walker`           | WASD movement relative to a camera                    |
//! | `Beacon`           | orbits and publishes its position to shared context   |
//! | `Tracker`          | chases the published beacon position                  |
//!
//! Fields of every script deserialize with defaults, so a scene only lists
//! what it changes.

pub mod beacon;
pub mod camera;
pub mod patrol;
pub mod platformer;
pub mod shooter;
pub mod spawner;
pub mod walker;

pub use beacon::{Beacon, BeaconPosition, Tracker};
pub use camera::CameraFollow;
pub use patrol::Patrol;
pub use platformer::PlatformerPlayer;
pub use shooter::ShooterPlayer;
pub use spawner::BlockSpawner;
pub use walker::Walker;

use script_runtime::ScriptRegistry;

/// Register every script in this crate under its type name.
///
/// # Errors
///
/// Fails if one of the names is already taken in `registry`.
pub fn register_all(registry: &mut ScriptRegistry) -> script_runtime::Result<()> {
    registry.register::<PlatformerPlayer>("PlatformerPlayer")?;
    registry.register::<CameraFollow>("CameraFollow")?;
    registry.register::<Patrol>("Patrol")?;
    registry.register::<BlockSpawner>("BlockSpawner")?;
    registry.register::<ShooterPlayer>("ShooterPlayer")?;
    registry.register::<Walker>("Walker")?;
    registry.register::<Beacon>("Beacon")?;
    registry.register::<Tracker>("Tracker")?;
    Ok(())
}
