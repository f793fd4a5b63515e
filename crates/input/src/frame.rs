use crate::action::{CameraDolly, LightMove};
use glam::Vec2;
use std::collections::BTreeSet;

/// Input service. The window layer pushes events into it as they arrive and
/// the main loop takes one [`FrameInput`] snapshot per frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: BTreeSet<char>,
    last_key: Option<char>,
    mouse_position: Vec2,
    mouse_motion: Vec2,
    wheel: f32,
    left_held: bool,
    left_pressed: bool,
    close_requested: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pressed(&mut self, key: char) {
        let key = key.to_ascii_lowercase();
        self.keys_held.insert(key);
        self.last_key = Some(key);
    }

    pub fn key_released(&mut self, key: char) {
        let key = key.to_ascii_lowercase();
        self.keys_held.remove(&key);
        if self.last_key == Some(key) {
            self.last_key = None;
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Raw relative motion, accumulated until the next snapshot.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_motion += Vec2::new(dx, dy);
    }

    /// Wheel delta, accumulated until the next snapshot.
    pub fn wheel(&mut self, delta: f32) {
        self.wheel += delta;
    }

    pub fn left_button(&mut self, pressed: bool) {
        if pressed && !self.left_held {
            self.left_pressed = true;
        }
        self.left_held = pressed;
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Drop held state, e.g. when the window loses focus and release events
    /// will never arrive.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.last_key = None;
        self.left_held = false;
    }

    /// Take this frame's view of the input. Motion, wheel and the button
    /// press edge reset; held keys, held button and pointer position persist.
    pub fn snapshot(&mut self) -> FrameInput {
        let frame = FrameInput {
            keys_held: self.keys_held.clone(),
            last_key: self.last_key,
            mouse_position: self.mouse_position,
            mouse_motion: std::mem::take(&mut self.mouse_motion),
            wheel: std::mem::take(&mut self.wheel),
            left_held: self.left_held,
            left_pressed: std::mem::take(&mut self.left_pressed),
            close_requested: self.close_requested,
        };
        if frame.wheel != 0.0 || frame.left_pressed {
            tracing::trace!(wheel = frame.wheel, left_pressed = frame.left_pressed, "input");
        }
        frame
    }
}

/// Immutable input state for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    keys_held: BTreeSet<char>,
    last_key: Option<char>,
    mouse_position: Vec2,
    mouse_motion: Vec2,
    wheel: f32,
    left_held: bool,
    left_pressed: bool,
    close_requested: bool,
}

impl FrameInput {
    pub fn last_key(&self) -> Option<char> {
        self.last_key
    }

    pub fn is_key_down(&self, key: char) -> bool {
        self.keys_held.contains(&key.to_ascii_lowercase())
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn mouse_motion(&self) -> Vec2 {
        self.mouse_motion
    }

    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    /// Left button is down this frame.
    pub fn is_left_button_clicked(&self) -> bool {
        self.left_held
    }

    /// Left button went down since the previous frame.
    pub fn left_button_pressed(&self) -> bool {
        self.left_pressed
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn light_move(&self) -> Option<LightMove> {
        LightMove::from_held(&self.keys_held)
    }

    pub fn camera_dolly(&self) -> Option<CameraDolly> {
        CameraDolly::from_wheel(self.wheel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_resets_per_frame_accumulators() {
        let mut input = Input::new();
        input.mouse_motion(3.0, 4.0);
        input.mouse_motion(1.0, -1.0);
        input.wheel(1.0);
        input.left_button(true);

        let first = input.snapshot();
        assert_eq!(first.mouse_motion(), Vec2::new(4.0, 3.0));
        assert_eq!(first.wheel(), 1.0);
        assert!(first.left_button_pressed());
        assert!(first.is_left_button_clicked());

        let second = input.snapshot();
        assert_eq!(second.mouse_motion(), Vec2::ZERO);
        assert_eq!(second.wheel(), 0.0);
        assert!(!second.left_button_pressed());
        assert!(second.is_left_button_clicked());
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut input = Input::new();
        input.key_pressed('W');
        let frame = input.snapshot();
        assert!(frame.is_key_down('w'));
        assert_eq!(frame.last_key(), Some('w'));
        assert_eq!(frame.light_move(), Some(LightMove::Forward));
    }

    #[test]
    fn held_keys_persist_until_released() {
        let mut input = Input::new();
        input.key_pressed('a');
        assert!(input.snapshot().is_key_down('a'));
        assert!(input.snapshot().is_key_down('a'));
        input.key_released('a');
        let frame = input.snapshot();
        assert!(!frame.is_key_down('a'));
        assert_eq!(frame.last_key(), None);
        assert_eq!(frame.light_move(), None);
    }

    #[test]
    fn last_key_tracks_most_recent_press() {
        let mut input = Input::new();
        input.key_pressed('s');
        input.key_pressed('d');
        assert_eq!(input.snapshot().last_key(), Some('d'));
        input.key_released('s');
        assert_eq!(input.snapshot().last_key(), Some('d'));
    }

    #[test]
    fn multiple_held_keys_yield_one_light_move() {
        let mut input = Input::new();
        input.key_pressed('e');
        input.key_pressed('a');
        input.key_pressed('s');
        assert_eq!(input.snapshot().light_move(), Some(LightMove::Backward));
    }

    #[test]
    fn press_edge_only_on_transition() {
        let mut input = Input::new();
        input.left_button(true);
        input.snapshot();
        input.left_button(true);
        assert!(!input.snapshot().left_button_pressed());
        input.left_button(false);
        input.left_button(true);
        assert!(input.snapshot().left_button_pressed());
    }

    #[test]
    fn close_request_is_sticky() {
        let mut input = Input::new();
        assert!(!input.snapshot().close_requested());
        input.request_close();
        assert!(input.snapshot().close_requested());
        assert!(input.snapshot().close_requested());
    }

    #[test]
    fn release_all_clears_held_state() {
        let mut input = Input::new();
        input.key_pressed('q');
        input.left_button(true);
        input.release_all();
        let frame = input.snapshot();
        assert!(!frame.is_key_down('q'));
        assert!(!frame.is_left_button_clicked());
    }

    #[test]
    fn wheel_accumulates_then_maps_to_dolly() {
        let mut input = Input::new();
        input.wheel(1.0);
        input.wheel(-3.0);
        assert_eq!(input.snapshot().camera_dolly(), Some(CameraDolly::Backward));
        assert_eq!(input.snapshot().camera_dolly(), None);
    }
}
