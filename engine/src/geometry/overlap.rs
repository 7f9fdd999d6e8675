//! Inclusive overlap tests on integer intervals and boxes

use super::AxisAlignedBox;

/// Whether the interval starting at `first` overlaps the one starting at
/// `second`.
///
/// Both ends are inclusive: an interval of length `n` covers
/// `start..=start + n - 1`.
pub fn overlap_1d(first: i32, first_length: i32, second: i32, second_length: i32) -> bool {
    let first_end = first + first_length - 1;
    let second_end = second + second_length - 1;
    second_end >= first && first_end >= second
}

/// Whether two boxes overlap on both axes
pub fn overlap_2d(first: &AxisAlignedBox, second: &AxisAlignedBox) -> bool {
    overlap_1d(first.x(), first.width(), second.x(), second.width())
        && overlap_1d(first.y(), first.height(), second.y(), second.height())
}
