//! Player Input
//!
//! Per-frame input snapshot handed to the world update. Axes are stored
//! as i8 so recorded input streams stay compact and replay exactly.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

/// Convert an i8 axis to [-1, 1]. `NO_INPUT` maps to zero.
#[inline]
pub fn axis_to_f32(input: i8) -> f32 {
    if input == InputFrame::NO_INPUT {
        0.0
    } else {
        input as f32 / 127.0
    }
}

/// Raw input state for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Movement X direction: -127 (left) to +127 (right)
    /// -128 = released / no input
    pub move_x: i8,

    /// Movement Y direction: -127 (up) to +127 (down)
    /// -128 = released / no input
    pub move_y: i8,
}

impl InputFrame {
    /// Special value indicating no input (stick released)
    pub const NO_INPUT: i8 = -128;

    /// Create a new empty input frame.
    pub const fn new() -> Self {
        Self {
            move_x: Self::NO_INPUT,
            move_y: Self::NO_INPUT,
        }
    }

    /// Create input with movement direction.
    pub const fn with_movement(move_x: i8, move_y: i8) -> Self {
        Self { move_x, move_y }
    }

    /// Movement direction, length at most 1.
    ///
    /// Full diagonals are normalized so they are not faster than
    /// straight moves.
    #[inline]
    pub fn move_direction(&self) -> Vec2 {
        let dir = Vec2::new(axis_to_f32(self.move_x), axis_to_f32(self.move_y));
        if dir.magnitude_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        }
    }
}

impl Default for InputFrame {
    fn default() -> Self {
        Self::new()
    }
}
