//! Pickles engine: fixed-point 2D physics and collision handling
//!
//! This crate provides the simulation core of a small 2D platformer engine:
//! integer geometry, a velocity integrator, axis-separated collision
//! resolution and a sweep-and-prune world that reports collision enter and
//! exit events.

pub mod config;
pub mod events;
pub mod geometry;
pub mod objects;
pub mod physics;
pub mod utils;

// Re-export commonly used types
pub mod prelude {
    // Entity storage
    pub use hecs::{Entity, World};

    // Geometry types
    pub use crate::geometry::{overlap_1d, overlap_2d, AxisAlignedBox, Vector2};

    // Object types
    pub use crate::objects::{
        attach, detach, is_attached_to, move_by, set_position, GameObject, ObjectError,
        ObjectEvent, ObjectEvents,
    };

    // Event names
    pub use crate::events::{
        EventDispatcher, EventError, ON_COLLIDER_ADD, ON_COLLIDER_ENTER, ON_COLLIDER_EXIT,
        ON_MOVE, ON_MOVE_RELATIVE, ON_TRIGGER_ADD, ON_TRIGGER_ENTER, ON_TRIGGER_EXIT,
        ON_UPDATE_ENTER, ON_UPDATE_EXIT,
    };

    // Config types
    pub use crate::config::{ConfigError, PhysicsConfig};

    // Physics types
    pub use crate::physics::{
        simulate_objects, CollisionWorld, DebugOverlay, EntityPhysics, ObjectHandle, ObjectKind,
        PhysicsBody, PhysicsDebugSettings, SweepStats, WorldError, WorldEvent,
    };
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
