//! Physics components for game objects

use crate::config::PhysicsConfig;
use crate::geometry::Vector2;
use crate::utils::divide_toward_zero;
use serde::{Deserialize, Serialize};

/// Scale of the fixed-point velocity accumulator
const VELOCITY_SCALE: i64 = 1000;

/// Errors raised when building a [`PhysicsBody`] from invalid parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhysicsError {
    #[error("mass must be positive, got {0}")]
    InvalidMass(i32),

    #[error("friction must be between 1 and 100, got {0}")]
    InvalidFriction(i32),

    #[error("terminal velocity must not be negative, got {0:?}")]
    InvalidTerminalVelocity(Vector2),
}

/// Axis of a 2D quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn of(self, v: Vector2) -> i32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    pub fn of_mut(self, v: &mut Vector2) -> &mut i32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }
}

/// Velocity integrator for a single object.
///
/// Velocities are whole units per tick. Sub-unit motion is kept in a scaled
/// accumulator so that many small steps still add up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Current velocity. May be changed directly between steps.
    pub velocity: Vector2,

    /// Externally applied acceleration, e.g. from player input
    pub acceleration: Vector2,

    mass: i32,
    friction: i32,
    gravity: Vector2,
    terminal_velocity: Vector2,

    #[serde(skip)]
    velocity_accumulator: [i64; 2],
}

impl PhysicsBody {
    pub fn builder() -> PhysicsBodyBuilder {
        PhysicsBodyBuilder::default()
    }

    pub fn mass(&self) -> i32 {
        self.mass
    }

    pub fn friction(&self) -> i32 {
        self.friction
    }

    pub fn gravity(&self) -> Vector2 {
        self.gravity
    }

    pub fn terminal_velocity(&self) -> Vector2 {
        self.terminal_velocity
    }

    /// Advance velocity by `ms` milliseconds.
    ///
    /// Only velocity changes; moving the owner by the new velocity is up to
    /// the caller.
    pub fn run_simulation(&mut self, ms: i32) {
        let total_acceleration = self.acceleration.add(self.gravity);

        for (index, axis) in Axis::BOTH.into_iter().enumerate() {
            let velocity = axis.of(self.velocity);
            let accumulator = &mut self.velocity_accumulator[index];

            // Velocity was set directly since the last step
            if divide_toward_zero(*accumulator, VELOCITY_SCALE) != i64::from(velocity) {
                *accumulator = i64::from(velocity) * VELOCITY_SCALE;
            }

            let acceleration = i64::from(axis.of(total_acceleration));
            if acceleration == 0 {
                *accumulator = divide_toward_zero(*accumulator * i64::from(self.friction), 100);
            }
            *accumulator += acceleration * i64::from(self.mass) * i64::from(ms);

            let terminal = i64::from(axis.of(self.terminal_velocity));
            let next = divide_toward_zero(*accumulator, VELOCITY_SCALE).clamp(-terminal, terminal);
            *axis.of_mut(&mut self.velocity) = next as i32;
        }

        debug_assert!(
            self.velocity.x.abs() <= self.terminal_velocity.x
                && self.velocity.y.abs() <= self.terminal_velocity.y,
            "velocity {:?} exceeds terminal velocity {:?}",
            self.velocity,
            self.terminal_velocity
        );
    }

    /// Cancel motion along one axis
    pub fn stop_axis(&mut self, axis: Axis) {
        *axis.of_mut(&mut self.velocity) = 0;
        *axis.of_mut(&mut self.acceleration) = 0;
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        PhysicsBodyBuilder::default().into_body()
    }
}

/// Builder for [`PhysicsBody`] with parameter validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBodyBuilder {
    mass: i32,
    friction: i32,
    gravity: Vector2,
    terminal_velocity: Vector2,
    velocity: Vector2,
    acceleration: Vector2,
}

impl Default for PhysicsBodyBuilder {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl PhysicsBodyBuilder {
    /// Start from the body defaults of a configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            mass: config.mass,
            friction: config.friction,
            gravity: config.gravity,
            terminal_velocity: config.terminal_velocity,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
        }
    }

    pub fn mass(mut self, mass: i32) -> Self {
        self.mass = mass;
        self
    }

    /// Percentage of velocity kept per step while unaccelerated
    pub fn friction(mut self, friction: i32) -> Self {
        self.friction = friction;
        self
    }

    pub fn gravity(mut self, gravity: impl Into<Vector2>) -> Self {
        self.gravity = gravity.into();
        self
    }

    pub fn terminal_velocity(mut self, terminal_velocity: impl Into<Vector2>) -> Self {
        self.terminal_velocity = terminal_velocity.into();
        self
    }

    pub fn velocity(mut self, velocity: impl Into<Vector2>) -> Self {
        self.velocity = velocity.into();
        self
    }

    pub fn acceleration(mut self, acceleration: impl Into<Vector2>) -> Self {
        self.acceleration = acceleration.into();
        self
    }

    pub fn build(self) -> Result<PhysicsBody, PhysicsError> {
        if self.mass <= 0 {
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        if !(1..=100).contains(&self.friction) {
            return Err(PhysicsError::InvalidFriction(self.friction));
        }
        if self.terminal_velocity.x < 0 || self.terminal_velocity.y < 0 {
            return Err(PhysicsError::InvalidTerminalVelocity(
                self.terminal_velocity,
            ));
        }
        Ok(self.into_body())
    }

    fn into_body(self) -> PhysicsBody {
        PhysicsBody {
            velocity: self.velocity,
            acceleration: self.acceleration,
            mass: self.mass,
            friction: self.friction,
            gravity: self.gravity,
            terminal_velocity: self.terminal_velocity,
            velocity_accumulator: [
                i64::from(self.velocity.x) * VELOCITY_SCALE,
                i64::from(self.velocity.y) * VELOCITY_SCALE,
            ],
        }
    }
}

/// Physics attached to a game object.
///
/// Objects without a body are immovable: collision resolution never moves
/// them and they never accumulate velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityPhysics {
    #[default]
    Immovable,
    Body(PhysicsBody),
}

impl EntityPhysics {
    pub fn body(&self) -> Option<&PhysicsBody> {
        match self {
            EntityPhysics::Immovable => None,
            EntityPhysics::Body(body) => Some(body),
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut PhysicsBody> {
        match self {
            EntityPhysics::Immovable => None,
            EntityPhysics::Body(body) => Some(body),
        }
    }

    pub fn is_immovable(&self) -> bool {
        matches!(self, EntityPhysics::Immovable)
    }

    /// Current velocity, zero for immovable objects
    pub fn velocity(&self) -> Vector2 {
        self.body().map_or(Vector2::ZERO, |body| body.velocity)
    }
}

impl From<PhysicsBody> for EntityPhysics {
    fn from(body: PhysicsBody) -> Self {
        EntityPhysics::Body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(
        mass: i32,
        acceleration: (i32, i32),
        gravity: (i32, i32),
        terminal_velocity: (i32, i32),
    ) -> PhysicsBody {
        PhysicsBody::builder()
            .mass(mass)
            .acceleration(acceleration)
            .gravity(gravity)
            .terminal_velocity(terminal_velocity)
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_body() {
        let body = PhysicsBody::builder()
            .velocity((1, 2))
            .acceleration((3, 4))
            .gravity((5, 6))
            .terminal_velocity((7, 8))
            .build()
            .unwrap();
        assert_eq!(body.velocity, Vector2::new(1, 2));
        assert_eq!(body.acceleration, Vector2::new(3, 4));
        assert_eq!(body.gravity(), Vector2::new(5, 6));
        assert_eq!(body.terminal_velocity(), Vector2::new(7, 8));
    }

    #[test]
    fn test_builder_rejects_invalid_parameters() {
        assert_eq!(
            PhysicsBody::builder().mass(0).build(),
            Err(PhysicsError::InvalidMass(0))
        );
        assert_eq!(
            PhysicsBody::builder().friction(0).build(),
            Err(PhysicsError::InvalidFriction(0))
        );
        assert_eq!(
            PhysicsBody::builder().friction(101).build(),
            Err(PhysicsError::InvalidFriction(101))
        );
        assert!(matches!(
            PhysicsBody::builder().terminal_velocity((-1, 5)).build(),
            Err(PhysicsError::InvalidTerminalVelocity(_))
        ));
    }

    #[test]
    fn test_simulate_with_mass() {
        // Mass of 2 doubles external and gravitational acceleration (1+1)*2
        let mut body = body(2, (1, 1), (1, 1), (100, 100));
        body.run_simulation(1000);
        assert_eq!(body.velocity, Vector2::new(4, 4));
    }

    #[test]
    fn test_simulate_positive_x() {
        let mut body = body(1, (2, 0), (3, 0), (100, 100));
        body.run_simulation(500);
        assert_eq!(body.velocity, Vector2::new(2, 0));
        body.run_simulation(500);
        assert_eq!(body.velocity, Vector2::new(5, 0));
    }

    #[test]
    fn test_simulate_negative_x_rounds_toward_zero() {
        let mut body = body(1, (-2, 0), (-3, 0), (100, 100));
        body.run_simulation(500);
        assert_eq!(body.velocity, Vector2::new(-2, 0));
        body.run_simulation(500);
        assert_eq!(body.velocity, Vector2::new(-5, 0));
    }

    #[test]
    fn test_simulate_y_axis() {
        let mut rising = body(1, (0, 2), (0, 3), (100, 100));
        rising.run_simulation(500);
        rising.run_simulation(500);
        assert_eq!(rising.velocity, Vector2::new(0, 5));

        let mut falling = body(1, (0, -2), (0, -3), (100, 100));
        falling.run_simulation(500);
        falling.run_simulation(500);
        assert_eq!(falling.velocity, Vector2::new(0, -5));
    }

    #[test]
    fn test_terminal_velocity_caps_both_directions() {
        let mut right = body(1, (10, 0), (10, 0), (5, 0));
        right.run_simulation(1000);
        assert_eq!(right.velocity, Vector2::new(5, 0));

        let mut left = body(1, (-10, 0), (-10, 0), (5, 0));
        left.run_simulation(1000);
        assert_eq!(left.velocity, Vector2::new(-5, 0));

        let mut up = body(1, (0, 10), (0, 10), (0, 5));
        up.run_simulation(1000);
        assert_eq!(up.velocity, Vector2::new(0, 5));

        let mut down = body(1, (0, -10), (0, -10), (0, 5));
        down.run_simulation(1000);
        assert_eq!(down.velocity, Vector2::new(0, -5));
    }

    #[test]
    fn test_small_steps_accumulate() {
        // 0.2 units per step is lost entirely without the accumulator
        let mut body = body(1, (1, 0), (0, 0), (100, 100));
        for _ in 0..5 {
            body.run_simulation(200);
        }
        assert_eq!(body.velocity, Vector2::new(1, 0));
    }

    #[test]
    fn test_direct_velocity_change_resyncs() {
        let mut body = body(1, (0, 0), (0, -1), (100, 100));
        body.run_simulation(500);
        assert_eq!(body.velocity, Vector2::new(0, 0));

        body.velocity.y = 10;
        body.run_simulation(500);
        assert_eq!(body.velocity, Vector2::new(0, 9));
    }

    #[test]
    fn test_friction_slows_unaccelerated_axis() {
        let mut body = PhysicsBody::builder()
            .gravity((0, 0))
            .friction(50)
            .velocity((8, 0))
            .build()
            .unwrap();

        body.run_simulation(16);
        assert_eq!(body.velocity, Vector2::new(4, 0));
        body.run_simulation(16);
        assert_eq!(body.velocity, Vector2::new(2, 0));
        for _ in 0..20 {
            body.run_simulation(16);
        }
        assert_eq!(body.velocity, Vector2::ZERO);
    }

    #[test]
    fn test_friction_ignored_while_accelerating() {
        let mut body = PhysicsBody::builder()
            .gravity((0, 0))
            .friction(1)
            .velocity((8, 0))
            .acceleration((1, 0))
            .build()
            .unwrap();

        body.run_simulation(1000);
        assert_eq!(body.velocity, Vector2::new(9, 0));
    }

    #[test]
    fn test_stop_axis() {
        let mut body = body(1, (3, 4), (0, 0), (100, 100));
        body.velocity = Vector2::new(5, 6);
        body.stop_axis(Axis::Y);
        assert_eq!(body.velocity, Vector2::new(5, 0));
        assert_eq!(body.acceleration, Vector2::new(3, 0));
    }

    #[test]
    fn test_immovable_has_no_velocity() {
        let physics = EntityPhysics::Immovable;
        assert!(physics.is_immovable());
        assert_eq!(physics.velocity(), Vector2::ZERO);

        let physics = EntityPhysics::from(PhysicsBody::builder().velocity((1, 2)).build().unwrap());
        assert_eq!(physics.velocity(), Vector2::new(1, 2));
    }

    #[test]
    fn test_body_serialization() {
        let body = body(3, (1, 0), (0, -10), (20, 40));
        let json = serde_json::to_string(&body).unwrap();
        let deserialized: PhysicsBody = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.mass(), 3);
        assert_eq!(deserialized.gravity(), Vector2::new(0, -10));
        assert_eq!(deserialized.terminal_velocity(), Vector2::new(20, 40));
    }
}
