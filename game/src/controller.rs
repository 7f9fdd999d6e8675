//! Side-scrolling platformer controls

use pickles_engine::objects::GameObject;
use pickles_engine::utils::divide_toward_zero;

/// Upward acceleration at the start of a jump
const JUMP_IMPULSE: i32 = 80;

/// Walking and jumping for a character with a physics body.
///
/// Every method takes the controlled object so the controller can be driven
/// from a query over the world. Objects without a body are ignored.
#[derive(Debug, Clone)]
pub struct PlatformerController {
    walk_acceleration: i32,
    jump_height: i32,
    last_ground_position: i32,
    is_jumping: bool,
}

impl PlatformerController {
    pub fn new(walk_acceleration: i32, jump_height: i32) -> Self {
        Self {
            walk_acceleration,
            jump_height,
            last_ground_position: 0,
            is_jumping: false,
        }
    }

    /// Jumping on purpose or moving vertically
    pub fn is_airborne(&self, character: &GameObject) -> bool {
        character.velocity().y != 0 || self.is_jumping
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    /// Start or continue a jump. Call once per tick while the key is held.
    ///
    /// The impulse eases out with the cube of the remaining height, so
    /// holding the key longer jumps higher up to `jump_height`.
    pub fn jump(&mut self, character: &mut GameObject) {
        let airborne = self.is_airborne(character);
        let y = character.y();
        let Some(body) = character.physics.body_mut() else {
            return;
        };

        if !airborne {
            self.last_ground_position = y;
            body.acceleration.y = JUMP_IMPULSE;
            self.is_jumping = true;
        }

        let height = y - self.last_ground_position;
        if height >= self.jump_height {
            body.acceleration.y = 0;
        } else {
            let remaining = i64::from((self.jump_height - height).max(0));
            let full = i64::from(self.jump_height).pow(3);
            body.acceleration.y =
                divide_toward_zero(i64::from(body.acceleration.y) * remaining.pow(3), full) as i32;
        }
    }

    /// Stop rising. Call when the jump key is released.
    pub fn cancel_jump(&mut self, character: &mut GameObject) {
        if let Some(body) = character.physics.body_mut() {
            if body.acceleration.y > 0 {
                body.acceleration.y = 0;
            }
        }
        self.is_jumping = false;
    }

    pub fn walk_left(&self, character: &mut GameObject) {
        if let Some(body) = character.physics.body_mut() {
            body.acceleration.x = -self.walk_acceleration;
        }
    }

    pub fn walk_right(&self, character: &mut GameObject) {
        if let Some(body) = character.physics.body_mut() {
            body.acceleration.x = self.walk_acceleration;
        }
    }

    pub fn stop_walking(&self, character: &mut GameObject) {
        if let Some(body) = character.physics.body_mut() {
            body.acceleration.x = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickles_engine::geometry::AxisAlignedBox;
    use pickles_engine::physics::PhysicsBody;

    fn character(y: i32) -> GameObject {
        let body = PhysicsBody::builder().build().unwrap();
        GameObject::new(AxisAlignedBox::new(0, y, 16, 16), body)
    }

    fn acceleration(character: &GameObject) -> (i32, i32) {
        character.physics.body().unwrap().acceleration.into()
    }

    #[test]
    fn test_walking() {
        let controller = PlatformerController::new(30, 48);
        let mut pickle = character(0);

        controller.walk_left(&mut pickle);
        assert_eq!(acceleration(&pickle), (-30, 0));
        controller.walk_right(&mut pickle);
        assert_eq!(acceleration(&pickle), (30, 0));
        controller.stop_walking(&mut pickle);
        assert_eq!(acceleration(&pickle), (0, 0));
    }

    #[test]
    fn test_jump_starts_with_full_impulse() {
        let mut controller = PlatformerController::new(30, 48);
        let mut pickle = character(16);

        assert!(!controller.is_airborne(&pickle));
        controller.jump(&mut pickle);

        assert!(controller.is_jumping());
        assert!(controller.is_airborne(&pickle));
        assert_eq!(acceleration(&pickle), (0, JUMP_IMPULSE));
    }

    #[test]
    fn test_jump_impulse_eases_out() {
        let mut controller = PlatformerController::new(30, 48);
        let mut pickle = character(0);
        controller.jump(&mut pickle);

        // Half way up: 80 * (24 / 48)^3 = 10
        pickle.bounds.set_position((0, 24));
        controller.jump(&mut pickle);
        assert_eq!(acceleration(&pickle), (0, 10));

        pickle.bounds.set_position((0, 48));
        controller.jump(&mut pickle);
        assert_eq!(acceleration(&pickle), (0, 0));
    }

    #[test]
    fn test_cancel_jump() {
        let mut controller = PlatformerController::new(30, 48);
        let mut pickle = character(0);
        controller.jump(&mut pickle);

        controller.cancel_jump(&mut pickle);
        assert!(!controller.is_jumping());
        assert_eq!(acceleration(&pickle), (0, 0));
    }

    #[test]
    fn test_immovable_character_is_ignored() {
        let mut controller = PlatformerController::new(30, 48);
        let mut wall = GameObject::immovable(AxisAlignedBox::new(0, 0, 4, 4));

        controller.walk_right(&mut wall);
        controller.jump(&mut wall);
        assert!(wall.physics.body().is_none());
    }
}
