//! Collision detection and resolution
//!
//! Resolution is split by axis. [`resolution_1d`] separates two intervals,
//! [`resolution_2d`] combines it for a box hitting an immovable box, and
//! [`resolution`] decides which of two objects moves. The caches turn the
//! pairs found each tick into enter and exit changes.

pub mod broad_phase;
pub mod cache;
pub mod resolution;
pub mod resolution_1d;
pub mod resolution_2d;

pub use broad_phase::{sort_by_left_edge, sweep_and_prune, SweepTarget};
pub use cache::{CollisionCache, CollisionPair, PositionalCollisionCache};
pub use resolution::resolve_game_object_collision;
pub use resolution_1d::nonoverlapping_coordinate_1d;
pub use resolution_2d::nonoverlapping_coordinates_2d;
