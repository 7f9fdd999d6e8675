//! Pairwise collision resolution between game objects

use super::resolution_1d::nonoverlapping_coordinate_1d;
use super::resolution_2d::nonoverlapping_coordinates_2d;
use crate::geometry::{overlap_1d, overlap_2d, Vector2};
use crate::objects::GameObject;
use crate::physics::{Axis, PhysicsBody};
use tracing::trace;

/// Separate two overlapping objects by moving one of them per axis.
///
/// Returns `None` when nothing was resolved: neither object has a body, or
/// the objects do not overlap. Otherwise returns the velocity removed from
/// the corrected object on each axis. An axis that was corrected while
/// already at rest reports the position correction instead, so the result
/// is `(0, 0)` only if neither object moved.
///
/// An object without a body is never moved. When both have bodies, on each
/// axis the object with the smaller absolute velocity stays put. Equal
/// speeds move the lighter object, and equal masses move `first`.
pub fn resolve_game_object_collision(
    first: &mut GameObject,
    second: &mut GameObject,
) -> Option<Vector2> {
    if first.physics.is_immovable() && second.physics.is_immovable() {
        return None;
    }
    if !overlap_2d(&first.bounds, &second.bounds) {
        return None;
    }

    let delta = match (first.physics.is_immovable(), second.physics.is_immovable()) {
        (false, true) => resolve_against_immovable(first, second),
        (true, false) => resolve_against_immovable(second, first),
        _ => {
            let x = if moves_on_axis(first, second, Axis::X) {
                resolve_x(first, second)
            } else {
                resolve_x(second, first)
            };
            let y = if moves_on_axis(first, second, Axis::Y) {
                resolve_y(first, second)
            } else {
                resolve_y(second, first)
            };
            Vector2::new(x, y)
        }
    };

    trace!(?delta, "Resolved collision");
    Some(delta)
}

/// Whether `first` is the object corrected along `axis`
fn moves_on_axis(first: &GameObject, second: &GameObject, axis: Axis) -> bool {
    let first_speed = axis.of(first.velocity()).abs();
    let second_speed = axis.of(second.velocity()).abs();
    match first_speed.cmp(&second_speed) {
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => mass(first) <= mass(second),
    }
}

fn mass(object: &GameObject) -> i32 {
    object.physics.body().map_or(i32::MAX, PhysicsBody::mass)
}

fn resolve_against_immovable(moving: &mut GameObject, fixed: &GameObject) -> Vector2 {
    let Some(body) = moving.physics.body_mut() else {
        return Vector2::ZERO;
    };
    let current = moving.bounds.position();
    let resolved = nonoverlapping_coordinates_2d(&moving.bounds, body.velocity, &fixed.bounds);

    let mut delta = Vector2::ZERO;
    for axis in Axis::BOTH {
        let correction = axis.of(resolved) - axis.of(current);
        if correction != 0 {
            *axis.of_mut(&mut delta) = removed_motion(body, axis, correction);
        }
    }
    moving.bounds.set_position(resolved);
    delta
}

fn resolve_x(moving: &mut GameObject, fixed: &GameObject) -> i32 {
    let previous_y = moving.y() - moving.velocity().y;
    if !overlap_1d(previous_y, moving.height(), fixed.y(), fixed.height()) {
        return 0;
    }
    let x = nonoverlapping_coordinate_1d(
        moving.x(),
        moving.width(),
        moving.velocity().x,
        fixed.x(),
        fixed.width(),
    );
    apply_axis(moving, Axis::X, x)
}

fn resolve_y(moving: &mut GameObject, fixed: &GameObject) -> i32 {
    if !overlap_1d(moving.x(), moving.width(), fixed.x(), fixed.width()) {
        return 0;
    }
    let y = nonoverlapping_coordinate_1d(
        moving.y(),
        moving.height(),
        moving.velocity().y,
        fixed.y(),
        fixed.height(),
    );
    apply_axis(moving, Axis::Y, y)
}

/// Move along one axis and cancel motion on it
fn apply_axis(moving: &mut GameObject, axis: Axis, coordinate: i32) -> i32 {
    let mut position = moving.position();
    let correction = coordinate - axis.of(position);
    if correction == 0 {
        return 0;
    }
    *axis.of_mut(&mut position) = coordinate;
    moving.bounds.set_position(position);

    match moving.physics.body_mut() {
        Some(body) => removed_motion(body, axis, correction),
        None => correction,
    }
}

/// Stop `body` on `axis` and report what the correction took away: the
/// velocity, or the correction itself when the body was not moving on it.
fn removed_motion(body: &mut PhysicsBody, axis: Axis, correction: i32) -> i32 {
    let velocity = axis.of(body.velocity);
    body.stop_axis(axis);
    if velocity != 0 {
        velocity
    } else {
        correction
    }
}
