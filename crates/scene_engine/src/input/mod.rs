//! Input management system
//!
//! Per-frame keyboard and mouse state. The event loop feeds raw events through
//! the `handle_*` methods; component hooks query the edge-triggered
//! (`*_down`/`*_up`) and level-triggered (`*_held`) state. [`InputManager::frame`]
//! runs once per tick after the scene update so edges last exactly one frame.

use std::collections::HashMap;

/// Key state within the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyState {
    /// Pressed this frame
    Down,
    /// Pressed in an earlier frame and not yet released
    Held,
    /// Released this frame
    Up,
}

/// Position and click count recorded with a mouse button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseClick {
    /// X coordinate of the click
    pub x: i32,
    /// Y coordinate of the click
    pub y: i32,
    /// Number of consecutive clicks (1 = single, 2 = double, ...)
    pub clicks: u8,
}

#[derive(Debug, Clone, Copy)]
struct ButtonState {
    state: KeyState,
    click: MouseClick,
}

/// Input manager
#[derive(Debug, Default)]
pub struct InputManager {
    keys: HashMap<KeyCode, KeyState>,
    buttons: HashMap<MouseButton, ButtonState>,
    mouse_position: (i32, i32),
    mouse_relative_motion: (i32, i32),
    mouse_wheel: (i32, i32),
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next frame
    ///
    /// Keys pressed last frame become held, released keys are forgotten, and
    /// per-frame mouse motion and wheel deltas are cleared.
    pub fn frame(&mut self) {
        self.keys.retain(|_, state| *state != KeyState::Up);
        for state in self.keys.values_mut() {
            *state = KeyState::Held;
        }

        self.buttons.retain(|_, button| button.state != KeyState::Up);
        for button in self.buttons.values_mut() {
            button.state = KeyState::Held;
        }

        self.mouse_relative_motion = (0, 0);
        self.mouse_wheel = (0, 0);
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // Repeats of an already held key keep it held.
            let state = self.keys.entry(key).or_insert(KeyState::Down);
            if *state == KeyState::Up {
                *state = KeyState::Down;
            }
        } else if self.keys.contains_key(&key) {
            self.keys.insert(key, KeyState::Up);
        }
    }

    /// Handle mouse button input at window position (`x`, `y`)
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool, x: i32, y: i32, clicks: u8) {
        let click = MouseClick { x, y, clicks };
        if pressed {
            self.buttons.insert(button, ButtonState { state: KeyState::Down, click });
        } else if let Some(entry) = self.buttons.get_mut(&button) {
            entry.state = KeyState::Up;
            entry.click = MouseClick { clicks: entry.click.clicks, ..click };
        }
    }

    /// Handle mouse movement to an absolute position
    pub fn handle_mouse_move(&mut self, x: i32, y: i32) {
        self.mouse_relative_motion.0 += x - self.mouse_position.0;
        self.mouse_relative_motion.1 += y - self.mouse_position.1;
        self.mouse_position = (x, y);
    }

    /// Handle mouse wheel scrolling
    pub fn handle_mouse_wheel(&mut self, dx: i32, dy: i32) {
        self.mouse_wheel.0 += dx;
        self.mouse_wheel.1 += dy;
    }

    /// Check if `key` was pressed during the last frame
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.key_is(key, KeyState::Down)
    }

    /// Check if `key` was released during the last frame
    pub fn is_key_up(&self, key: KeyCode) -> bool {
        self.key_is(key, KeyState::Up)
    }

    /// Check if `key` is currently pressed (including the frame it went down)
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        matches!(self.keys.get(&key), Some(KeyState::Down | KeyState::Held))
    }

    /// Click info if `button` was pressed during the last frame
    pub fn mouse_button_down(&self, button: MouseButton) -> Option<MouseClick> {
        self.button_is(button, |state| state == KeyState::Down)
    }

    /// Release position if `button` was released during the last frame
    pub fn mouse_button_up(&self, button: MouseButton) -> Option<MouseClick> {
        self.button_is(button, |state| state == KeyState::Up)
    }

    /// Last click info if `button` is currently pressed
    ///
    /// The coordinates are where the press happened; use
    /// [`InputManager::mouse_position`] for the live cursor position.
    pub fn mouse_button_held(&self, button: MouseButton) -> Option<MouseClick> {
        self.button_is(button, |state| matches!(state, KeyState::Down | KeyState::Held))
    }

    /// Current mouse position, `(0, 0)` until the mouse first moves
    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse_position
    }

    /// Mouse motion accumulated over the last frame
    pub fn mouse_relative_motion(&self) -> (i32, i32) {
        self.mouse_relative_motion
    }

    /// Check if the mouse moved during the last frame
    pub fn mouse_moved(&self) -> bool {
        self.mouse_relative_motion != (0, 0)
    }

    /// Wheel scroll accumulated over the last frame
    pub fn mouse_wheel_movement(&self) -> (i32, i32) {
        self.mouse_wheel
    }

    /// Check if the wheel scrolled during the last frame
    pub fn mouse_wheel_moved(&self) -> bool {
        self.mouse_wheel != (0, 0)
    }

    fn key_is(&self, key: KeyCode, state: KeyState) -> bool {
        self.keys.get(&key) == Some(&state)
    }

    fn button_is(&self, button: MouseButton, predicate: impl Fn(KeyState) -> bool) -> Option<MouseClick> {
        self.buttons
            .get(&button)
            .filter(|entry| predicate(entry.state))
            .map(|entry| entry.click)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}
