use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keyboard keys the game knows how to bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Space,
    Up,
    Down,
    Left,
    Right,
    W,
    S,
    B,
    P,
    Return,
    Escape,
}

/// One physical input: a keyboard key or a joypad button index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Key(Key),
    Button(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Input),
    Released(Input),
}

/// Held inputs plus the press/release edges seen during the current frame.
///
/// Repeated presses of an input that is already held (OS key repeat) are
/// dropped, so `just_pressed` fires once per physical press.
#[derive(Default)]
pub struct InputState {
    held: HashSet<Input>,
    pub events: Vec<InputEvent>,
    pub quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's edges. Held inputs stay held.
    pub fn begin_frame(&mut self) {
        self.events.clear();
    }

    pub fn press(&mut self, input: Input) {
        if self.held.insert(input) {
            self.events.push(InputEvent::Pressed(input));
        }
    }

    pub fn release(&mut self, input: Input) {
        if self.held.remove(&input) {
            self.events.push(InputEvent::Released(input));
        }
    }

    pub fn is_held(&self, input: Input) -> bool {
        self.held.contains(&input)
    }

    pub fn just_pressed(&self, input: Input) -> bool {
        self.events.contains(&InputEvent::Pressed(input))
    }

    pub fn just_released(&self, input: Input) -> bool {
        self.events.contains(&InputEvent::Released(input))
    }

    /// Inputs pressed during this frame, in arrival order.
    pub fn pressed_this_frame(&self) -> impl Iterator<Item = Input> + '_ {
        self.events.iter().filter_map(|event| match event {
            InputEvent::Pressed(input) => Some(*input),
            InputEvent::Released(_) => None,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACE: Input = Input::Key(Key::Space);

    #[test]
    fn key_repeat_does_not_produce_a_second_edge() {
        let mut input = InputState::new();
        input.press(SPACE);
        input.press(SPACE);
        assert_eq!(input.events, vec![InputEvent::Pressed(SPACE)]);

        input.begin_frame();
        input.press(SPACE);
        assert!(!input.just_pressed(SPACE));
        assert!(input.is_held(SPACE));
    }

    #[test]
    fn release_edge_fires_once() {
        let mut input = InputState::new();
        input.press(SPACE);
        input.begin_frame();
        input.release(SPACE);
        input.release(SPACE);
        assert!(input.just_released(SPACE));
        assert_eq!(input.events.len(), 1);

        input.begin_frame();
        assert!(!input.just_released(SPACE));
        assert!(!input.is_held(SPACE));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.release(Input::Button(3));
        assert!(input.events.is_empty());
    }

    #[test]
    fn bindings_use_readable_names() {
        let json = serde_json::to_string(&Input::Key(Key::Space)).unwrap();
        assert_eq!(json, r#"{"key":"space"}"#);
        let button: Input = serde_json::from_str(r#"{"button":2}"#).unwrap();
        assert_eq!(button, Input::Button(2));
    }
}
