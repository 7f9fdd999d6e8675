//! Physics update system
//!
//! Advances every body by one tick and moves its object by the resulting
//! velocity. Collision handling is a separate step, see
//! [`CollisionWorld::update`](super::CollisionWorld::update).

use crate::geometry::Vector2;
use crate::objects::{self, GameObject, ObjectError};
use hecs::{Entity, World};
use tracing::trace;

/// Integrate every object with a body, then move it by its new velocity.
///
/// Each object is moved with a single [`objects::set_position`] so listeners
/// see one move per tick. Returns the number of objects that moved.
pub fn simulate_objects(world: &mut World, ms: i32) -> Result<usize, ObjectError> {
    let mut moves: Vec<(Entity, Vector2)> = Vec::new();

    for (entity, object) in world.query_mut::<&mut GameObject>() {
        let position = object.position();
        let Some(body) = object.physics.body_mut() else {
            continue;
        };
        body.run_simulation(ms);
        if !body.velocity.is_zero() {
            moves.push((entity, position.add(body.velocity)));
        }
    }

    let mut moved = 0;
    for (entity, position) in moves {
        if objects::set_position(world, entity, position)? {
            moved += 1;
        }
    }

    trace!(moved, ms, "Simulated objects");
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AxisAlignedBox, Vector2};
    use crate::physics::PhysicsBody;

    #[test]
    fn test_bodies_fall_and_immovables_stay() {
        let mut world = World::new();
        let body = PhysicsBody::builder().gravity((0, -10)).build().unwrap();
        let falling = world.spawn((GameObject::new(AxisAlignedBox::new(0, 50, 2, 2), body),));
        let floor = world.spawn((GameObject::immovable(AxisAlignedBox::new(0, 0, 10, 5)),));

        // -10 * 1 * 100ms = one unit of velocity per tick
        assert_eq!(simulate_objects(&mut world, 100).unwrap(), 1);
        assert_eq!(simulate_objects(&mut world, 100).unwrap(), 1);

        let object = world.get::<&GameObject>(falling).unwrap();
        assert_eq!(object.position(), Vector2::new(0, 47));
        assert_eq!(object.velocity(), Vector2::new(0, -2));
        let floor = world.get::<&GameObject>(floor).unwrap();
        assert_eq!(floor.position(), Vector2::new(0, 0));
    }

    #[test]
    fn test_slow_body_accumulates_before_moving() {
        let mut world = World::new();
        let body = PhysicsBody::builder().gravity((0, -10)).build().unwrap();
        let entity = world.spawn((GameObject::new(AxisAlignedBox::new(0, 0, 1, 1), body),));

        // 16ms ticks: -160, -320, ..., velocity reaches -1 on the 7th tick
        for _ in 0..6 {
            assert_eq!(simulate_objects(&mut world, 16).unwrap(), 0);
        }
        assert_eq!(simulate_objects(&mut world, 16).unwrap(), 1);
        assert_eq!(
            world.get::<&GameObject>(entity).unwrap().position(),
            Vector2::new(0, -1)
        );
    }
}
