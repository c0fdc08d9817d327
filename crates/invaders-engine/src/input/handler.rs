use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Held keys for the current frame plus a snapshot of the previous frame.
///
/// [`update`](Self::update) must run exactly once per frame, after gameplay has
/// read input; otherwise [`is_pressed`](Self::is_pressed) misses or repeats edges.
#[derive(Debug, Default)]
pub struct InputHandler {
    keys: HashSet<Key>,
    previous: HashSet<Key>,
    focused: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key transition or a focus change.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys.insert(*key);
                }
                KeyState::Released => {
                    self.keys.remove(key);
                }
            },
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases never arrive for keys held while unfocused.
                    self.keys.clear();
                }
            }
        }
    }

    /// Held right now.
    pub fn is_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Went down since the last [`update`](Self::update).
    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key) && !self.previous.contains(&key)
    }

    /// Rolls the previous-frame snapshot forward.
    pub fn update(&mut self) {
        self.previous.clone_from(&self.keys);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}
