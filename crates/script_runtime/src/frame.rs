//! Frame loop.
//!
//! Each frame runs the script hooks, then lets the engine advance:
//!
//! 1. [`ScriptHost::update`] with the frame's delta time.
//! 2. [`FrameDriver::advance`] so the engine integrates and clears
//!    per-frame input.

use std::time::{Duration, Instant};

use script_core::{MemoryEngine, NativeCalls};
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};
use crate::host::{FrameStats, ScriptHost};

/// An engine that steps its own state once per frame, after scripts ran.
pub trait FrameDriver: NativeCalls {
    fn advance(&self, dt: f32);
}

impl FrameDriver for MemoryEngine {
    fn advance(&self, dt: f32) {
        self.step(dt);
        self.end_frame();
    }
}

const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Frame rate and run length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            max_frames: 0,
        }
    }
}

impl FrameConfig {
    /// # Errors
    ///
    /// [`RuntimeError::InvalidFrameRate`] unless one frame at this rate
    /// lasts a non-zero [`Duration`]. Rejects zero, negative and non-finite
    /// rates, and rates too high or too low for a `Duration`.
    pub fn validate(&self) -> Result<()> {
        self.checked_duration()
            .map(|_| ())
            .ok_or(RuntimeError::InvalidFrameRate(self.frame_rate))
    }

    /// Nominal duration of one frame. A rate that fails [`Self::validate`]
    /// gets the default rate's duration.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.checked_duration()
            .unwrap_or(Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE))
    }

    fn checked_duration(&self) -> Option<Duration> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / self.frame_rate)
            .ok()
            .filter(|duration| !duration.is_zero())
    }

    fn done(&self, frames: u64) -> bool {
        self.max_frames > 0 && frames >= self.max_frames
    }
}

/// Drives a [`ScriptHost`] against a [`FrameDriver`] at a fixed rate.
#[derive(Debug)]
pub struct FrameLoop {
    config: FrameConfig,
    frames: u64,
}

impl FrameLoop {
    /// # Errors
    ///
    /// Fails if `config` has an invalid frame rate.
    pub fn new(config: FrameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, frames: 0 })
    }

    #[must_use]
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Frames run by this loop so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run a single frame with the given delta time.
    pub fn tick<E: FrameDriver>(&mut self, host: &mut ScriptHost, engine: &E, dt: f32) -> FrameStats {
        self.frames += 1;
        let stats = host.update(engine, dt);
        engine.advance(dt);
        stats
    }

    /// Run frames on the calling thread at the configured rate, with a fixed
    /// delta time of one nominal frame. Returns after `max_frames`; with
    /// `max_frames == 0` it never returns.
    pub fn run<E: FrameDriver>(&mut self, host: &mut ScriptHost, engine: &E) {
        let frame_duration = self.config.frame_duration();
        let dt = frame_duration.as_secs_f32();

        info!(
            frame_rate = self.config.frame_rate,
            max_frames = self.config.max_frames,
            "starting frame loop"
        );

        loop {
            let start = Instant::now();
            self.tick(host, engine, dt);

            if self.config.done(self.frames) {
                info!(frames = self.frames, "frame loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame = self.frames,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }
    }

    /// Run frames on a tokio interval until `max_frames` or ctrl-c.
    ///
    /// `dt` is the measured time since the previous frame; the first frame
    /// uses the nominal frame duration. `before_frame` runs ahead of the
    /// script hooks each frame and gets the upcoming frame number, which is
    /// where a caller feeds input into the engine.
    pub async fn run_async<E, F>(&mut self, host: &mut ScriptHost, engine: &E, mut before_frame: F)
    where
        E: FrameDriver,
        F: FnMut(u64, &E),
    {
        let frame_duration = self.config.frame_duration();
        let mut interval = tokio::time::interval(frame_duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!(
            frame_rate = self.config.frame_rate,
            max_frames = self.config.max_frames,
            "starting frame loop"
        );

        let mut last: Option<Instant> = None;
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    info!(frames = self.frames, "interrupted, stopping frame loop");
                    break;
                }
            }

            let now = Instant::now();
            let dt = last.map_or(frame_duration, |last| now - last).as_secs_f32();
            last = Some(now);

            before_frame(self.frames + 1, engine);
            let stats = self.tick(host, engine, dt);
            debug!(frame = stats.frame, dt, "frame");

            let elapsed = now.elapsed();
            if elapsed > frame_duration {
                warn!(
                    frame = self.frames,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }

            if self.config.done(self.frames) {
                info!(frames = self.frames, "frame loop complete");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use script_core::{Script, ScriptContext};
    use script_math::Vec3;

    use super::*;

    struct Drift;

    impl Script for Drift {
        fn on_update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
            ctx.entity().translation().update(|t| t + Vec3::X * dt);
        }
    }

    #[test]
    fn test_invalid_frame_rate() {
        for frame_rate in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e10, 1e-300] {
            let config = FrameConfig {
                frame_rate,
                max_frames: 1,
            };
            assert!(matches!(
                FrameLoop::new(config),
                Err(RuntimeError::InvalidFrameRate(_))
            ));
        }
    }

    #[test]
    fn test_frame_duration_at_extreme_rates() {
        let config = |frame_rate| FrameConfig {
            frame_rate,
            max_frames: 0,
        };
        assert!(config(1e8).validate().is_ok());
        assert!(!config(1e8).frame_duration().is_zero());
        assert!(config(0.5).validate().is_ok());
        assert_eq!(config(0.5).frame_duration(), Duration::from_secs(2));

        // Rejected rates never reach tokio as a zero or overflowing period.
        assert!(!config(1e10).frame_duration().is_zero());
        assert_eq!(config(1e-300).frame_duration(), FrameConfig::default().frame_duration());
    }

    #[test]
    fn test_run_limited_frames() {
        let engine = MemoryEngine::new();
        let id = engine.spawn("Drifter");
        let mut host = ScriptHost::new();
        host.attach(id, "Drift", Box::new(Drift)).unwrap();

        let mut frames = FrameLoop::new(FrameConfig {
            frame_rate: 1000.0,
            max_frames: 5,
        })
        .unwrap();
        frames.run(&mut host, &engine);

        assert_eq!(frames.frames(), 5);
        assert_eq!(host.frame(), 5);
        let x = engine.pose(id).unwrap().translation.x;
        assert!((x - 0.005).abs() < 1e-5);
    }

    #[test]
    fn test_tick_advances_engine_input() {
        let engine = MemoryEngine::new();
        let mut host = ScriptHost::new();
        let mut frames = FrameLoop::new(FrameConfig::default()).unwrap();

        engine.press_key(script_core::KeyCode::Space);
        engine.release_key(script_core::KeyCode::Space);
        assert!(engine.is_key_released(script_core::KeyCode::Space));
        frames.tick(&mut host, &engine, 0.016);
        assert!(!engine.is_key_released(script_core::KeyCode::Space));
    }

    #[tokio::test]
    async fn test_run_async_feeds_input_each_frame() {
        let engine = MemoryEngine::new();
        let id = engine.spawn("Drifter");
        let mut host = ScriptHost::new();
        host.attach(id, "Drift", Box::new(Drift)).unwrap();

        let mut frames = FrameLoop::new(FrameConfig {
            frame_rate: 500.0,
            max_frames: 3,
        })
        .unwrap();
        let mut seen = Vec::new();
        frames
            .run_async(&mut host, &engine, |frame, _engine| seen.push(frame))
            .await;

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(host.frame(), 3);
        assert!(engine.pose(id).unwrap().translation.x > 0.0);
    }
}
