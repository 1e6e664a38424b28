use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub use winit::keyboard::KeyCode;

use crate::game::Controls;

/// Raw keyboard state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
        self.keys_released.insert(key);
    }

    /// Forget the edge events of the frame that just ended.
    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.keys_released.contains(&key) }
}

/// Maps logical actions to one or more keys.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<KeyCode>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, key: KeyCode) {
        self.bindings.entry(action).or_default().push(key);
    }

    pub fn keys(&self, action: A) -> &[KeyCode] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or_default()
    }

    /// True if a bound key went down this frame.
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.keys(action).iter().any(|k| input.is_key_pressed(*k))
    }

    /// True while any bound key is down.
    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.keys(action).iter().any(|k| input.is_key_held(*k))
    }

    pub fn is_released(&self, action: A, input: &InputState) -> bool {
        self.keys(action).iter().any(|k| input.is_key_released(*k))
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

// ── Game actions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Interact,
    ToggleMusic,
    Confirm,
    Back,
}

impl Action {
    /// WASD or arrows to move, `E` to interact, `M` for music,
    /// `Enter`/`Space` to confirm and `Escape` to go back.
    pub fn default_bindings() -> ActionMap<Action> {
        let mut map = ActionMap::new();
        map.bind(Action::MoveLeft, KeyCode::KeyA);
        map.bind(Action::MoveLeft, KeyCode::ArrowLeft);
        map.bind(Action::MoveRight, KeyCode::KeyD);
        map.bind(Action::MoveRight, KeyCode::ArrowRight);
        map.bind(Action::MoveUp, KeyCode::KeyW);
        map.bind(Action::MoveUp, KeyCode::ArrowUp);
        map.bind(Action::MoveDown, KeyCode::KeyS);
        map.bind(Action::MoveDown, KeyCode::ArrowDown);
        map.bind(Action::Interact, KeyCode::KeyE);
        map.bind(Action::ToggleMusic, KeyCode::KeyM);
        map.bind(Action::Confirm, KeyCode::Enter);
        map.bind(Action::Confirm, KeyCode::Space);
        map.bind(Action::Back, KeyCode::Escape);
        map
    }
}

/// The held game controls for this frame.
pub fn controls(map: &ActionMap<Action>, input: &InputState) -> Controls {
    Controls {
        left: map.is_held(Action::MoveLeft, input),
        right: map.is_held(Action::MoveRight, input),
        up: map.is_held(Action::MoveUp, input),
        down: map.is_held(Action::MoveDown, input),
        interact: map.is_held(Action::Interact, input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_an_edge_but_held_persists() {
        let map = Action::default_bindings();
        let mut input = InputState::new();
        input.press(KeyCode::ArrowLeft);
        assert!(map.is_pressed(Action::MoveLeft, &input));

        input.clear_frame_state();
        input.press(KeyCode::ArrowLeft);
        assert!(!map.is_pressed(Action::MoveLeft, &input));
        assert!(controls(&map, &input).left);

        input.release(KeyCode::ArrowLeft);
        assert!(map.is_released(Action::MoveLeft, &input));
        assert_eq!(controls(&map, &input), Controls::default());
    }
}
