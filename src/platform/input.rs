//! Keyboard mapping and held-key state

use glam::Vec2;

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Escape: toggle pause
    Pause,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (WASD in either case, or arrows)
    pub fn from_dom(key: &str) -> Self {
        match key {
            "w" | "W" | "ArrowUp" => Key::Up,
            "s" | "S" | "ArrowDown" => Key::Down,
            "a" | "A" | "ArrowLeft" => Key::Left,
            "d" | "D" | "ArrowRight" => Key::Right,
            "Escape" => Key::Pause,
            _ => Key::Other,
        }
    }
}

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Up => self.up = held,
            Key::Down => self.down = held,
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::Pause | Key::Other => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Raw movement axis; opposite keys cancel out
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}
