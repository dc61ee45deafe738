use std::collections::{HashMap, HashSet};

use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::math::Vec2;

/// Camera movement intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Back,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
    ];
}

/// Physical keys bound to each [`Action`].
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keys: HashMap<Action, KeyCode>,
}

impl Default for KeyBindings {
    /// W/S/A/D to move, Space to rise, left Shift to sink.
    fn default() -> Self {
        let keys = HashMap::from([
            (Action::Forward, KeyCode::KeyW),
            (Action::Back, KeyCode::KeyS),
            (Action::Left, KeyCode::KeyA),
            (Action::Right, KeyCode::KeyD),
            (Action::Up, KeyCode::Space),
            (Action::Down, KeyCode::ShiftLeft),
        ]);
        Self { keys }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebinds `action` to `key`.
    pub fn bind(mut self, action: Action, key: KeyCode) -> Self {
        self.keys.insert(action, key);
        self
    }

    pub fn key(&self, action: Action) -> Option<KeyCode> {
        self.keys.get(&action).copied()
    }
}

/// What the camera needs from one frame of input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Cursor position in window pixels (virtual while the cursor is locked).
    pub cursor: Vec2,
    /// Movement actions whose key is held.
    pub held: HashSet<Action>,
}

impl InputSnapshot {
    pub fn new(cursor: Vec2) -> Self {
        Self {
            cursor,
            held: HashSet::new(),
        }
    }

    pub fn with(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    pub fn holds(&self, action: Action) -> bool {
        self.held.contains(&action)
    }
}

/// Tracks held keys and the cursor from winit events.
///
/// While the cursor is locked to the window, absolute cursor events stop
/// arriving on most platforms, so raw mouse motion from
/// [`handle_device_event`](Self::handle_device_event) moves a virtual cursor
/// instead. Look input is then unbounded by the window edges.
#[derive(Debug, Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    cursor: Vec2,
    cursor_locked: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each frame to reset per-frame state.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Switches between absolute and raw-motion cursor tracking.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    pub fn cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } if !self.cursor_locked => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Focused(false) => {
                // Release events are lost while unfocused.
                self.keys_down.clear();
            }
            _ => {}
        }
    }

    /// Process raw device input. Only used while the cursor is locked.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event
            && self.cursor_locked
        {
            self.cursor += Vec2::new(*dx as f32, *dy as f32);
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn move_cursor(&mut self, position: Vec2) {
        self.cursor = position;
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Resolves held keys to actions through `bindings`.
    pub fn snapshot(&self, bindings: &KeyBindings) -> InputSnapshot {
        let held = Action::ALL
            .into_iter()
            .filter(|&a| bindings.key(a).is_some_and(|k| self.key_down(k)))
            .collect();
        InputSnapshot {
            cursor: self.cursor,
            held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_maps_default_bindings() {
        let mut input = Input::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::ShiftLeft);
        input.press(KeyCode::KeyQ);
        input.move_cursor(Vec2::new(10.0, 20.0));

        let snap = input.snapshot(&KeyBindings::default());
        assert_eq!(snap.cursor, Vec2::new(10.0, 20.0));
        assert!(snap.holds(Action::Forward));
        assert!(snap.holds(Action::Down));
        assert_eq!(snap.held.len(), 2);
    }

    #[test]
    fn rebinding_replaces_key() {
        let bindings = KeyBindings::new().bind(Action::Up, KeyCode::KeyE);
        let mut input = Input::new();
        input.press(KeyCode::Space);
        assert!(!input.snapshot(&bindings).holds(Action::Up));
        input.press(KeyCode::KeyE);
        assert!(input.snapshot(&bindings).holds(Action::Up));
    }

    #[test]
    fn release_and_pressed_tracking() {
        let mut input = Input::new();
        input.press(KeyCode::KeyA);
        assert!(input.key_pressed(KeyCode::KeyA));
        input.end_frame();
        input.press(KeyCode::KeyA);
        assert!(!input.key_pressed(KeyCode::KeyA));
        input.release(KeyCode::KeyA);
        assert!(!input.key_down(KeyCode::KeyA));
    }

    #[test]
    fn locked_cursor_accumulates_raw_motion() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(100.0, 100.0));
        let motion = DeviceEvent::MouseMotion { delta: (3.0, -2.0) };

        input.handle_device_event(&motion);
        assert_eq!(input.cursor(), Vec2::new(100.0, 100.0));

        input.set_cursor_locked(true);
        input.handle_device_event(&motion);
        input.handle_device_event(&motion);
        assert_eq!(input.cursor(), Vec2::new(106.0, 96.0));
    }
}
