//! Collision resolution along a single axis

use crate::geometry::overlap_1d;

/// New start for the first interval so that it no longer overlaps the second.
///
/// A first interval moving backwards is placed just past the far end of the
/// second one. Otherwise, including at rest, it is placed just before the
/// second interval's start. Returns `first` unchanged when there is no
/// overlap.
pub fn nonoverlapping_coordinate_1d(
    first: i32,
    first_length: i32,
    first_velocity: i32,
    second: i32,
    second_length: i32,
) -> i32 {
    if !overlap_1d(first, first_length, second, second_length) {
        first
    } else if first_velocity < 0 {
        second + second_length
    } else {
        second - first_length
    }
}
