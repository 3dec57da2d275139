//! Input tracking for pointer-driven fields.
//!
//! The field only needs the last known pointer position. Hosts feed raw
//! events in (`mousemove` on the web, `CursorMoved` natively) and read the
//! position back once per frame. The native preview also uses the small key
//! tracker for its shortcuts.
//!
//! ```ignore
//! input.handle_event(&event);
//! field.set_pointer(input.pointer());
//! if input.key_pressed(KeyCode::R) {
//!     field.reinitialize(size);
//! }
//! input.begin_frame();
//! ```

use glam::Vec2;
use std::collections::HashSet;

#[cfg(not(target_arch = "wasm32"))]
use winit::event::{ElementState, WindowEvent};
#[cfg(not(target_arch = "wasm32"))]
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the preview window and the page controllers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Enter,
    Escape,
    Left,
    Right,
    R,
    S,
    /// Any key the preview does not use.
    Other,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Enter => KeyCode::Enter,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyS => KeyCode::S,
            _ => KeyCode::Other,
        }
    }
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            " " => KeyCode::Space,
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            "ArrowLeft" => KeyCode::Left,
            "ArrowRight" => KeyCode::Right,
            "r" | "R" => KeyCode::R,
            "s" | "S" => KeyCode::S,
            _ => KeyCode::Other,
        }
    }

    /// Keys that activate a focused button-like element.
    pub fn is_activation(self) -> bool {
        matches!(self, KeyCode::Enter | KeyCode::Space)
    }
}

/// Pointer and key state.
///
/// The pointer starts at the surface origin and keeps its last position
/// when it leaves the window, so particles near the corner it left stay
/// pushed until it comes back.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    pointer: Vec2,
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in surface pixels.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Record a pointer move.
    pub fn move_pointer(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Check if a key went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Record a key going down. Auto-repeat does not count as a new press.
    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    /// Record a key going up.
    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Clear per-frame state. Call after the frame has read its input.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a winit window event.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = KeyCode::from(code);
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered to unfocused windows.
                self.keys_held.clear();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new();
        assert!(!input.key_pressed(KeyCode::Space));

        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));

        // After begin_frame the press is consumed
        input.begin_frame();
        assert!(!input.key_pressed(KeyCode::Space));

        // Held key repeating is not a new press
        input.press_key(KeyCode::Space);
        assert!(!input.key_pressed(KeyCode::Space));

        // Released and pressed again is
        input.release_key(KeyCode::Space);
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_pointer_starts_at_origin_and_keeps_last_position() {
        let mut input = Input::new();
        assert_eq!(input.pointer(), Vec2::ZERO);

        input.move_pointer(Vec2::new(10.0, 5.0));
        input.move_pointer(Vec2::new(12.0, 9.0));
        assert_eq!(input.pointer(), Vec2::new(12.0, 9.0));

        input.begin_frame();
        assert_eq!(input.pointer(), Vec2::new(12.0, 9.0));
    }

    #[test]
    fn test_dom_keys() {
        assert_eq!(KeyCode::from_dom_key("ArrowLeft"), KeyCode::Left);
        assert_eq!(KeyCode::from_dom_key("r"), KeyCode::R);
        assert_eq!(KeyCode::from_dom_key("q"), KeyCode::Other);
        assert_eq!(KeyCode::from_dom_key("Enter"), KeyCode::Enter);
        assert!(KeyCode::from_dom_key(" ").is_activation());
        assert!(KeyCode::from_dom_key("Enter").is_activation());
        assert!(!KeyCode::from_dom_key("Tab").is_activation());
    }
}
