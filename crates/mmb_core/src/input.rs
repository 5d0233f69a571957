//! Keyboard and mouse state collected by the window event handler and read
//! once per simulation tick.
//!
//! Window events only ever record transitions here. The simulation polls
//! `is_held` / `is_just_pressed` / `is_just_released` during a tick, and the
//! main loop calls `end_tick()` once a tick has consumed the edges. Frames
//! that run zero ticks leave the edges in place, so a quick tap between ticks
//! is never lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    A,
    D,
    W,
    Escape,
    F3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    /// Cursor positions (logical pixels) of clicks not yet consumed by a tick.
    clicks: Vec<(MouseBtn, f32, f32)>,

    /// Last known cursor position in logical pixels.
    pub cursor: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. OS auto-repeat is absorbed: a key that is already
    /// held does not produce a second press edge.
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.clicks.push((btn, self.cursor.0, self.cursor.1));
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    pub fn any_just_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.pressed.contains(k))
    }

    pub fn any_just_released(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.released.contains(k))
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    /// Positions of clicks with `btn` since the last consumed tick, oldest first.
    pub fn clicks(&self, btn: MouseBtn) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.clicks
            .iter()
            .filter(move |(b, _, _)| *b == btn)
            .map(|&(_, x, y)| (x, y))
    }

    /// Clear edge state after a tick has read it. Held state persists.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.clicks.clear();
    }

    /// Forget everything, e.g. when the window loses focus and key-up events
    /// may never arrive.
    pub fn reset(&mut self) {
        self.held.clear();
        self.mouse_held.clear();
        self.end_tick();
    }
}
