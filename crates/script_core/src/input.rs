//! Keyboard and mouse state, read through the native surface.

use script_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::native::NativeCalls;

/// Keyboard keys scripts can poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Space,
    Enter,
    Escape,
    Tab,
    LeftShift,
    LeftControl,
    Left,
    Right,
    Up,
    Down,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MouseCode {
    ButtonLeft,
    ButtonRight,
    ButtonMiddle,
}

/// Input polling for the current frame.
#[derive(Clone, Copy)]
pub struct Input<'a> {
    native: &'a dyn NativeCalls,
}

impl<'a> Input<'a> {
    pub(crate) fn new(native: &'a dyn NativeCalls) -> Self {
        Self { native }
    }

    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.native.is_key_pressed(key)
    }

    /// True only on the frame the key went up.
    #[must_use]
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.native.is_key_released(key)
    }

    #[must_use]
    pub fn is_mouse_down(&self, button: MouseCode) -> bool {
        self.native.is_mouse_down(button)
    }

    /// True while `button` is not held.
    #[must_use]
    pub fn is_mouse_up(&self, button: MouseCode) -> bool {
        self.native.is_mouse_up(button)
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.native.mouse_position()
    }

    pub fn set_mouse_position(&self, position: Vec2) {
        self.native.set_mouse_position(position);
    }

    /// Cursor movement since the previous frame.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.native.mouse_delta()
    }

    #[must_use]
    pub fn is_mouse_dragging(&self) -> bool {
        self.native.is_mouse_dragging()
    }

    #[must_use]
    pub fn is_mouse_hidden(&self) -> bool {
        self.native.is_mouse_hidden()
    }

    pub fn set_mouse_hidden(&self, hidden: bool) {
        self.native.set_mouse_hidden(hidden);
    }

    pub fn toggle_mouse_lock(&self) {
        self.native.toggle_mouse_lock();
    }
}

impl std::fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input").finish_non_exhaustive()
    }
}
