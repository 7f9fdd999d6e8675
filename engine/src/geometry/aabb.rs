//! Axis-aligned box anchored at its lower-left corner

use super::{overlap_2d, Vector2, VectorOperand};
use serde::{Deserialize, Serialize};

/// Rectangle with a mutable position and a fixed size.
///
/// The size never changes in place. A different size means a different box,
/// see [`AxisAlignedBox::resized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisAlignedBox {
    position: Vector2,
    width: i32,
    height: i32,
}

impl AxisAlignedBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0, "box size must not be negative");
        Self {
            position: Vector2::new(x, y),
            width,
            height,
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Lower-left corner
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// First x coordinate past the right edge
    pub fn right(&self) -> i32 {
        self.position.x + self.width
    }

    /// First y coordinate past the top edge
    pub fn top(&self) -> i32 {
        self.position.y + self.height
    }

    /// Center, rounded down to whole units
    pub fn center(&self) -> Vector2 {
        self.position
            .add(Vector2::new(self.width, self.height).floor_div(2))
    }

    pub fn set_position(&mut self, position: impl VectorOperand) {
        self.position.set(position);
    }

    pub fn move_by(&mut self, delta: impl VectorOperand) {
        self.position = self.position.add(delta);
    }

    /// A box of a different size at the same position
    pub fn resized(&self, width: i32, height: i32) -> Self {
        Self::new(self.position.x, self.position.y, width, height)
    }

    pub fn overlaps(&self, other: &AxisAlignedBox) -> bool {
        overlap_2d(self, other)
    }
}
