//! Fixed-point 2D physics and collision handling
//!
//! [`PhysicsBody`] integrates velocity with integer arithmetic,
//! [`simulate_objects`] applies it to every game object, and
//! [`CollisionWorld`] separates colliders and reports enter/exit changes.

pub mod collision;
pub mod components;
pub mod debug;
pub mod system;
pub mod world;

// Re-export commonly used types
pub use collision::{CollisionCache, CollisionPair, PositionalCollisionCache};
pub use components::{Axis, EntityPhysics, PhysicsBody, PhysicsBodyBuilder, PhysicsError};
pub use debug::{DebugLine, DebugOverlay, PhysicsDebugSettings};
pub use system::simulate_objects;
pub use world::{
    CollisionWorld, ObjectHandle, ObjectKind, ObjectSnapshot, SweepStats, WorldError, WorldEvent,
};
