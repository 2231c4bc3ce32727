//! Control snapshot consumed by the simulation
//!
//! Input capture callbacks write into a shared [`InputState`] whenever they
//! like; the step reads one sanitized copy at the top of every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Set of currently held directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn press(&mut self, dir: Direction) {
        self.set(dir, true);
    }

    pub fn release(&mut self, dir: Direction) {
        self.set(dir, false);
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Unit-per-axis intent; opposite directions cancel out
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Input state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Held movement keys
    pub held: HeldDirections,
    /// Fire button / touch fire
    pub fire: bool,
    /// Virtual joystick vector (magnitude <= 1), only read while active
    pub analog: Vec2,
    pub analog_active: bool,
}

impl InputState {
    /// Copy with the analog vector forced finite and capped at length 1
    pub fn sanitized(&self) -> Self {
        let analog = if self.analog.is_finite() {
            self.analog.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        Self { analog, ..*self }
    }

    /// Combined movement intent before normalization
    pub fn movement_intent(&self) -> Vec2 {
        let mut intent = self.held.axis();
        if self.analog_active {
            intent += self.analog;
        }
        intent
    }
}
