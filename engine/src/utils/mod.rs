//! Small helpers shared across the engine

pub mod math;

pub use math::{divide_floor, divide_toward_zero};
