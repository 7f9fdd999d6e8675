//! Turns per-tick collision sets into enter and exit deltas

use crate::geometry::Vector2;
use crate::physics::{Axis, ObjectHandle};
use std::collections::{BTreeMap, BTreeSet};

/// Unordered pair of registered objects.
///
/// Stored with the lower handle first so `(a, b)` and `(b, a)` are one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    first: ObjectHandle,
    second: ObjectHandle,
}

impl CollisionPair {
    pub fn new(a: ObjectHandle, b: ObjectHandle) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// Lower handle of the pair
    pub fn first(&self) -> ObjectHandle {
        self.first
    }

    /// Higher handle of the pair
    pub fn second(&self) -> ObjectHandle {
        self.second
    }
}

/// Set of colliding pairs with the changes since the last update
#[derive(Debug, Clone, Default)]
pub struct CollisionCache {
    cached: BTreeSet<CollisionPair>,
    current: BTreeSet<CollisionPair>,
    new: BTreeSet<CollisionPair>,
    removed: BTreeSet<CollisionPair>,
}

impl CollisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a collision seen during the current tick
    pub fn add_collision(&mut self, a: ObjectHandle, b: ObjectHandle) {
        self.current.insert(CollisionPair::new(a, b));
    }

    /// Diff the current tick against the cache and start a new tick
    pub fn update(&mut self) {
        self.new = self.current.difference(&self.cached).copied().collect();
        self.cached.extend(self.new.iter().copied());

        self.removed = self.cached.difference(&self.current).copied().collect();
        for pair in &self.removed {
            self.cached.remove(pair);
        }

        self.current.clear();
    }

    /// Pairs that started colliding during the last update
    pub fn new_collisions(&self) -> &BTreeSet<CollisionPair> {
        &self.new
    }

    /// Pairs that stopped colliding during the last update
    pub fn removed_collisions(&self) -> &BTreeSet<CollisionPair> {
        &self.removed
    }

    pub fn is_colliding(&self, a: ObjectHandle, b: ObjectHandle) -> bool {
        self.cached.contains(&CollisionPair::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.cached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cached.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PositionalEntry {
    first_position: Vector2,
    second_position: Vector2,
    velocity_delta: Vector2,
}

/// Collision cache for colliders.
///
/// A resolved collision stays cached until the objects have visibly moved
/// apart. An object resting on the floor is pushed out of it every tick, but
/// while the pair keeps the same positions, or the resolution removed no
/// velocity on an axis, the contact is treated as ongoing instead of
/// exiting and entering again.
#[derive(Debug, Clone, Default)]
pub struct PositionalCollisionCache {
    cache: CollisionCache,
    entries: BTreeMap<CollisionPair, PositionalEntry>,
}

impl PositionalCollisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved collision with the positions after resolution.
    ///
    /// A zero `velocity_delta` means the resolution did not change any
    /// motion, so nothing is recorded. Returns whether the collision was
    /// recorded.
    pub fn add_collision(
        &mut self,
        (a, a_position): (ObjectHandle, Vector2),
        (b, b_position): (ObjectHandle, Vector2),
        velocity_delta: Vector2,
    ) -> bool {
        if velocity_delta.is_zero() {
            return false;
        }

        let pair = CollisionPair::new(a, b);
        let (first_position, second_position) = if pair.first() == a {
            (a_position, b_position)
        } else {
            (b_position, a_position)
        };

        self.cache.add_collision(a, b);
        self.entries.insert(
            pair,
            PositionalEntry {
                first_position,
                second_position,
                velocity_delta,
            },
        );
        true
    }

    /// Diff the current tick against the cache.
    ///
    /// `position_of` returns the current position of a registered object.
    /// Pairs that were not seen this tick but are repeats of their cached
    /// collision are kept.
    pub fn update<F>(&mut self, position_of: F)
    where
        F: Fn(ObjectHandle) -> Option<Vector2>,
    {
        self.cache.update();

        let kept: Vec<CollisionPair> = self
            .cache
            .removed
            .iter()
            .copied()
            .filter(|pair| self.is_repeat(pair, &position_of))
            .collect();
        for pair in kept {
            self.cache.removed.remove(&pair);
            self.cache.cached.insert(pair);
        }

        for pair in &self.cache.removed {
            self.entries.remove(pair);
        }
    }

    fn is_repeat<F>(&self, pair: &CollisionPair, position_of: &F) -> bool
    where
        F: Fn(ObjectHandle) -> Option<Vector2>,
    {
        let Some(entry) = self.entries.get(pair) else {
            return false;
        };
        let first = position_of(pair.first());
        let second = position_of(pair.second());

        Axis::BOTH.into_iter().all(|axis| {
            let unmoved = first.is_some_and(|p| axis.of(p) == axis.of(entry.first_position))
                && second.is_some_and(|p| axis.of(p) == axis.of(entry.second_position));
            unmoved || axis.of(entry.velocity_delta) == 0
        })
    }

    pub fn new_collisions(&self) -> &BTreeSet<CollisionPair> {
        self.cache.new_collisions()
    }

    pub fn removed_collisions(&self) -> &BTreeSet<CollisionPair> {
        self.cache.removed_collisions()
    }

    pub fn is_colliding(&self, a: ObjectHandle, b: ObjectHandle) -> bool {
        self.cache.is_colliding(a, b)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const A: ObjectHandle = ObjectHandle(0);
    const B: ObjectHandle = ObjectHandle(1);

    fn pairs(set: &BTreeSet<CollisionPair>) -> Vec<(ObjectHandle, ObjectHandle)> {
        set.iter().map(|p| (p.first(), p.second())).collect()
    }

    #[test]
    fn test_pair_is_canonical() {
        assert_eq!(CollisionPair::new(A, B), CollisionPair::new(B, A));
        assert_eq!(CollisionPair::new(B, A).first(), A);
    }

    #[test]
    fn test_new_collision_is_new_and_not_removed() {
        let mut cache = CollisionCache::new();
        cache.add_collision(A, B);
        cache.add_collision(B, A);
        cache.update();

        assert_eq!(pairs(cache.new_collisions()), vec![(A, B)]);
        assert!(cache.removed_collisions().is_empty());
        assert!(cache.is_colliding(B, A));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut cache = CollisionCache::new();
        cache.add_collision(A, B);
        cache.update();
        cache.add_collision(A, B);
        cache.update();

        assert!(cache.new_collisions().is_empty());
        assert!(cache.removed_collisions().is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_collision_is_removed_once() {
        let mut cache = CollisionCache::new();
        cache.add_collision(A, B);
        cache.update();

        cache.update();
        assert_eq!(pairs(cache.removed_collisions()), vec![(A, B)]);
        assert!(cache.is_empty());

        cache.update();
        assert!(cache.removed_collisions().is_empty());
        assert!(cache.new_collisions().is_empty());
    }

    struct Positions(HashMap<ObjectHandle, Vector2>);

    impl Positions {
        fn new(a: (i32, i32), b: (i32, i32)) -> Self {
            Self(HashMap::from([(A, a.into()), (B, b.into())]))
        }

        fn get(&self, handle: ObjectHandle) -> Option<Vector2> {
            self.0.get(&handle).copied()
        }

        fn set(&mut self, handle: ObjectHandle, position: (i32, i32)) {
            self.0.insert(handle, position.into());
        }
    }

    fn add(cache: &mut PositionalCollisionCache, positions: &Positions, delta: (i32, i32)) -> bool {
        cache.add_collision(
            (A, positions.get(A).unwrap()),
            (B, positions.get(B).unwrap()),
            delta.into(),
        )
    }

    #[test]
    fn test_zero_delta_is_not_recorded() {
        let positions = Positions::new((1, 3), (2, 2));
        let mut cache = PositionalCollisionCache::new();

        assert!(!add(&mut cache, &positions, (0, 0)));
        cache.update(|h| positions.get(h));

        assert!(cache.new_collisions().is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_repeated_collision_is_not_new_or_removed() {
        let positions = Positions::new((1, 3), (2, 2));
        let mut cache = PositionalCollisionCache::new();

        add(&mut cache, &positions, (1, 1));
        cache.update(|h| positions.get(h));
        assert_eq!(cache.new_collisions().len(), 1);

        add(&mut cache, &positions, (1, 1));
        cache.update(|h| positions.get(h));
        assert!(cache.new_collisions().is_empty());
        assert!(cache.removed_collisions().is_empty());
    }

    #[test]
    fn test_resting_contact_is_kept_without_resolution() {
        let positions = Positions::new((1, 3), (2, 2));
        let mut cache = PositionalCollisionCache::new();

        add(&mut cache, &positions, (1, 1));
        cache.update(|h| positions.get(h));

        // Nothing resolved this tick, but neither object moved
        cache.update(|h| positions.get(h));

        assert!(cache.removed_collisions().is_empty());
        assert!(cache.is_colliding(A, B));
    }

    #[test]
    fn test_movement_on_axis_without_delta_is_kept() {
        let mut positions = Positions::new((1, 3), (2, 2));
        let mut cache = PositionalCollisionCache::new();

        add(&mut cache, &positions, (0, -2));
        cache.update(|h| positions.get(h));

        // Sliding along X does not end a contact resolved on Y
        positions.set(A, (6, 3));
        cache.update(|h| positions.get(h));

        assert!(cache.removed_collisions().is_empty());
        assert!(cache.is_colliding(A, B));
    }

    #[test]
    fn test_collision_is_removed_after_moving_apart() {
        let mut positions = Positions::new((1, 3), (2, 2));
        let mut cache = PositionalCollisionCache::new();

        add(&mut cache, &positions, (1, 1));
        cache.update(|h| positions.get(h));

        positions.set(A, (4, 4));
        assert!(!add(&mut cache, &positions, (0, 0)));
        cache.update(|h| positions.get(h));

        assert!(cache.new_collisions().is_empty());
        assert_eq!(pairs(cache.removed_collisions()), vec![(A, B)]);
        assert!(!cache.is_colliding(A, B));

        // The cached positions are gone, so returning is a new collision
        positions.set(A, (1, 3));
        add(&mut cache, &positions, (1, 1));
        cache.update(|h| positions.get(h));
        assert_eq!(cache.new_collisions().len(), 1);
    }

    #[test]
    fn test_unknown_object_counts_as_moved() {
        let positions = Positions::new((1, 3), (2, 2));
        let mut cache = PositionalCollisionCache::new();

        add(&mut cache, &positions, (1, 1));
        cache.update(|h| positions.get(h));

        cache.update(|_| None);
        assert_eq!(cache.removed_collisions().len(), 1);
    }
}
