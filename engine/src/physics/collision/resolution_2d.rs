//! Collision resolution of a box against an immovable box

use super::resolution_1d::nonoverlapping_coordinate_1d;
use crate::geometry::{overlap_1d, AxisAlignedBox, Vector2};

/// New position for `first` so that it no longer overlaps `second`.
///
/// X is corrected only if the boxes overlapped on Y before this tick's
/// vertical motion. Y is then corrected only if the boxes still overlap on X
/// after the X correction. A box landing on a floor is therefore pushed up
/// instead of sideways.
pub fn nonoverlapping_coordinates_2d(
    first: &AxisAlignedBox,
    first_velocity: Vector2,
    second: &AxisAlignedBox,
) -> Vector2 {
    let mut x = first.x();
    let mut y = first.y();
    let previous_y = first.y() - first_velocity.y;

    if overlap_1d(previous_y, first.height(), second.y(), second.height()) {
        x = nonoverlapping_coordinate_1d(
            first.x(),
            first.width(),
            first_velocity.x,
            second.x(),
            second.width(),
        );
    }
    if overlap_1d(x, first.width(), second.x(), second.width()) {
        y = nonoverlapping_coordinate_1d(
            first.y(),
            first.height(),
            first_velocity.y,
            second.y(),
            second.height(),
        );
    }

    Vector2::new(x, y)
}
