use std::collections::BTreeSet;

use crate::action::Action;
use crate::keymap::{Key, Keymap};

/// Polled input, queried once per tick.
pub trait InputSource {
    /// Whether any key bound to `action` is currently held.
    fn is_held(&self, action: Action) -> bool;

    /// Whether a key bound to `action` went down this frame.
    fn was_pressed(&self, action: Action) -> bool;
}

/// Held/pressed key tracking fed by raw key events.
///
/// Call [`KeyState::end_frame`] after every tick so presses last one frame.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    keymap: Keymap,
    held: BTreeSet<Key>,
    pressed: BTreeSet<Key>,
}

impl KeyState {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            held: BTreeSet::new(),
            pressed: BTreeSet::new(),
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Record a key-down event. Repeats while held do not re-trigger a press.
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
            tracing::trace!(?key, action = ?self.keymap.action_for(key), "key down");
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Clear the one-frame "pressed" set.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Release everything, e.g. on focus loss.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

impl InputSource for KeyState {
    fn is_held(&self, action: Action) -> bool {
        self.keymap.keys_for(action).any(|k| self.held.contains(&k))
    }

    fn was_pressed(&self, action: Action) -> bool {
        self.keymap.keys_for(action).any(|k| self.pressed.contains(&k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_maps_to_action() {
        let mut state = KeyState::default();
        state.key_down(Key::ArrowUp);
        assert!(state.is_held(Action::MoveForward));
        assert!(!state.is_held(Action::MoveBack));
        state.key_up(Key::ArrowUp);
        assert!(!state.is_held(Action::MoveForward));
    }

    #[test]
    fn press_lasts_one_frame() {
        let mut state = KeyState::default();
        state.key_down(Key::A);
        assert!(state.was_pressed(Action::RotateLeft));
        state.end_frame();
        assert!(!state.was_pressed(Action::RotateLeft));
        assert!(state.is_held(Action::RotateLeft));
    }

    #[test]
    fn key_repeat_does_not_press_again() {
        let mut state = KeyState::default();
        state.key_down(Key::D);
        state.end_frame();
        state.key_down(Key::D);
        assert!(!state.was_pressed(Action::RotateRight));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut state = KeyState::default();
        state.key_down(Key::Q);
        for action in Action::ALL {
            assert!(!state.is_held(action));
        }
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut state = KeyState::default();
        state.key_down(Key::ArrowLeft);
        state.key_down(Key::ArrowRight);
        state.release_all();
        assert!(!state.is_held(Action::MoveLeft));
        assert!(!state.is_held(Action::MoveRight));
    }
}
