// Input state tracking for movement keys and mouse look.
// The platform layer translates its own events into press/release/motion
// calls; this module only keeps the per-frame snapshot.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

pub struct InputState {
    // Keyboard
    keys_held: HashSet<MoveKey>,

    // Mouse: relative motion accumulated this frame, reset in end_frame()
    pub mouse_delta: (f32, f32),
    /// Mouse look only applies while the cursor is captured.
    pub mouse_captured: bool,

    // Window height in pixels (pixels-to-radians conversion for mouse look)
    pub window_height: u32,
}

impl InputState {
    pub fn new(window_height: u32) -> Self {
        Self {
            keys_held: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            mouse_captured: false,
            window_height,
        }
    }

    pub fn press(&mut self, key: MoveKey) {
        self.keys_held.insert(key);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.keys_held.remove(&key);
    }

    /// Accumulate relative mouse motion. Ignored while uncaptured.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.mouse_captured {
            self.mouse_delta.0 += dx;
            self.mouse_delta.1 += dy;
        }
    }

    /// Call once per frame after update() has consumed input.
    pub fn end_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }

    pub fn is_key_held(&self, key: MoveKey) -> bool {
        self.keys_held.contains(&key)
    }
}
