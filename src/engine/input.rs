// Keyboard and mouse-wheel state folded into normalized rig axes
// Abstracts winit events into a queryable per-frame snapshot
//
// Axis mapping:
//   A / D  -> pan_x  (-1 / +1)
//   S / W  -> pan_y  (-1 / +1)
//   Q / E  -> rotate (-1 / +1)
//   wheel  -> zoom   (lines; pixel deltas scaled down to lines)

use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::rig::RigInput;

/// Pixel scroll deltas per wheel line.
const PIXELS_PER_LINE: f32 = 100.0;

pub struct InputState {
    keys_held: HashSet<KeyCode>,

    // Scroll: accumulated vertical scroll this frame, reset in end_frame()
    pub scroll_delta: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            scroll_delta: 0.0,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the game's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => self.scroll(scroll_lines(delta)),
            WindowEvent::Focused(false) => self.keys_held.clear(),
            _ => {}
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.keys_held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Current snapshot as normalized rig axes.
    pub fn axes(&self) -> RigInput {
        RigInput {
            pan_x: self.axis(KeyCode::KeyA, KeyCode::KeyD),
            pan_y: self.axis(KeyCode::KeyS, KeyCode::KeyW),
            rotate: self.axis(KeyCode::KeyQ, KeyCode::KeyE),
            zoom: self.scroll_delta,
        }
    }

    /// Call once per frame after the rig has consumed axes().
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
    }

    // -1 when only `negative` is held, +1 when only `positive` is, 0 otherwise.
    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_key_held(negative) { value -= 1.0; }
        if self.is_key_held(positive) { value += 1.0; }
        value
    }
}

/// Vertical wheel movement in lines; touchpad pixels are scaled down.
pub fn scroll_lines(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}
