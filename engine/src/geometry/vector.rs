//! Integer 2D vector used for positions, velocities and accelerations

use crate::utils::divide_floor;
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Right-hand side of a component-wise vector operation.
///
/// Implemented for another [`Vector2`], a scalar applied to both components,
/// and an `(x, y)` tuple.
pub trait VectorOperand {
    /// The operand as an `(x, y)` pair
    fn components(&self) -> (i32, i32);
}

impl VectorOperand for Vector2 {
    fn components(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl VectorOperand for i32 {
    fn components(&self) -> (i32, i32) {
        (*self, *self)
    }
}

impl VectorOperand for (i32, i32) {
    fn components(&self) -> (i32, i32) {
        *self
    }
}

/// Two signed integer components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: i32,
    pub y: i32,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Overwrite both components in place
    pub fn set(&mut self, value: impl VectorOperand) {
        let (x, y) = value.components();
        self.x = x;
        self.y = y;
    }

    pub fn add(self, other: impl VectorOperand) -> Self {
        let (x, y) = other.components();
        Self::new(self.x + x, self.y + y)
    }

    pub fn sub(self, other: impl VectorOperand) -> Self {
        let (x, y) = other.components();
        Self::new(self.x - x, self.y - y)
    }

    pub fn mul(self, other: impl VectorOperand) -> Self {
        let (x, y) = other.components();
        Self::new(self.x * x, self.y * y)
    }

    /// Component-wise division rounding toward negative infinity
    pub fn floor_div(self, other: impl VectorOperand) -> Self {
        let (x, y) = other.components();
        Self::new(
            divide_floor(self.x.into(), x.into()) as i32,
            divide_floor(self.y.into(), y.into()) as i32,
        )
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl From<(i32, i32)> for Vector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vector2> for (i32, i32) {
    fn from(v: Vector2) -> Self {
        (v.x, v.y)
    }
}

impl From<IVec2> for Vector2 {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for IVec2 {
    fn from(v: Vector2) -> Self {
        IVec2::new(v.x, v.y)
    }
}

impl PartialEq<(i32, i32)> for Vector2 {
    fn eq(&self, other: &(i32, i32)) -> bool {
        (self.x, self.y) == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operands() {
        let v = Vector2::new(4, -6);

        assert_eq!(v.add(Vector2::new(1, 2)), (5, -4));
        assert_eq!(v.add(3), (7, -3));
        assert_eq!(v.add((10, 20)), (14, 14));

        assert_eq!(v.sub(Vector2::new(1, 2)), (3, -8));
        assert_eq!(v.sub(1), (3, -7));

        assert_eq!(v.mul(1000), (4000, -6000));
        assert_eq!(v.mul((2, 0)), (8, 0));
    }

    #[test]
    fn test_floor_div_rounds_down() {
        let v = Vector2::new(7, -7);
        assert_eq!(v.floor_div(2), (3, -4));
        assert_eq!(v.floor_div((7, 7)), (1, -1));
    }

    #[test]
    fn test_set_in_place() {
        let mut v = Vector2::ZERO;
        v.set((3, 4));
        assert_eq!(v, Vector2::new(3, 4));

        v.set(9);
        assert_eq!(v, Vector2::new(9, 9));
    }

    #[test]
    fn test_glam_conversion() {
        let v = Vector2::new(-2, 5);
        let ivec: IVec2 = v.into();
        assert_eq!(ivec, IVec2::new(-2, 5));
        assert_eq!(Vector2::from(ivec), v);
    }

    #[test]
    fn test_vector_serialization() {
        let v = Vector2::new(1, -2);
        let json = serde_json::to_string(&v).unwrap();
        let deserialized: Vector2 = serde_json::from_str(&json).unwrap();
        assert_eq!(v, deserialized);
    }
}
