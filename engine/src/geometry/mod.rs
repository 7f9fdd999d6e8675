//! Integer geometry primitives: vectors, boxes and overlap tests

pub mod aabb;
pub mod overlap;
pub mod vector;

pub use aabb::AxisAlignedBox;
pub use overlap::{overlap_1d, overlap_2d};
pub use vector::{Vector2, VectorOperand};
