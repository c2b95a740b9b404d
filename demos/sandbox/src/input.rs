//! Scripted input: what to press, and when.
//!
//! ```json
//! [
//!   { "frame": 1, "action": "press", "key": "D" },
//!   { "frame": 30, "action": "press", "key": "Space" },
//!   { "frame": 31, "action": "release", "key": "Space" },
//!   { "frame": 40, "action": "mouse_move", "delta": [4.0, 0.0] },
//!   { "frame": 50, "action": "mouse_button", "button": "ButtonLeft", "down": true }
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use script_core::{KeyCode, MemoryEngine, MouseCode};
use script_math::Vec2;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Press { key: KeyCode },
    Release { key: KeyCode },
    MouseButton { button: MouseCode, down: bool },
    MouseMove { delta: Vec2 },
    Focus { focusing: bool },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub action: Action,
}

/// Input events sorted by frame.
#[derive(Debug, Clone, Default)]
pub struct InputPlan {
    events: Vec<InputEvent>,
    next: usize,
}

impl InputPlan {
    pub fn new(mut events: Vec<InputEvent>) -> Self {
        events.sort_by_key(|event| event.frame);
        Self { events, next: 0 }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading input plan {}", path.display()))?;
        let events: Vec<InputEvent> = serde_json::from_str(&text)
            .with_context(|| format!("parsing input plan {}", path.display()))?;
        Ok(Self::new(events))
    }

    /// Feed every event scheduled up to and including `frame` into `engine`.
    pub fn apply(&mut self, frame: u64, engine: &MemoryEngine) {
        while let Some(event) = self.events.get(self.next) {
            if event.frame > frame {
                break;
            }
            debug!(frame, action = ?event.action, "input");
            match event.action {
                Action::Press { key } => engine.press_key(key),
                Action::Release { key } => engine.release_key(key),
                Action::MouseButton { button, down } => engine.set_mouse_button(button, down),
                Action::MouseMove { delta } => engine.move_mouse(delta),
                Action::Focus { focusing } => engine.set_focusing(focusing),
            }
            self.next += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use script_core::NativeCalls;

    use super::*;

    #[test]
    fn test_parse_and_apply_in_frame_order() {
        let events: Vec<InputEvent> = serde_json::from_str(
            r#"[
                { "frame": 3, "action": "release", "key": "D" },
                { "frame": 1, "action": "press", "key": "D" },
                { "frame": 2, "action": "mouse_button", "button": "ButtonLeft", "down": true }
            ]"#,
        )
        .unwrap();
        let mut plan = InputPlan::new(events);
        let engine = MemoryEngine::new();

        plan.apply(1, &engine);
        assert!(engine.is_key_pressed(KeyCode::D));
        assert!(!engine.is_mouse_down(MouseCode::ButtonLeft));

        plan.apply(2, &engine);
        assert!(engine.is_mouse_down(MouseCode::ButtonLeft));

        plan.apply(5, &engine);
        assert!(!engine.is_key_pressed(KeyCode::D));
        assert!(engine.is_key_released(KeyCode::D));
    }
}
