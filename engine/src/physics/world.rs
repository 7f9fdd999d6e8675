//! Collision world orchestrating the broad phase, resolution and notifications
//!
//! The world holds non-owning references to registered entities. Each tick it
//! sorts them by left edge, sweeps for candidate pairs, resolves colliders,
//! detects trigger overlaps and dispatches enter/exit notifications to both
//! members of every pair whose state changed.

use super::collision::{
    resolve_game_object_collision, sort_by_left_edge, sweep_and_prune, CollisionCache,
    CollisionPair, PositionalCollisionCache, SweepTarget,
};
use crate::config::PhysicsConfig;
use crate::events::{
    EventDispatcher, EventError, ON_COLLIDER_ADD, ON_COLLIDER_ENTER, ON_COLLIDER_EXIT,
    ON_TRIGGER_ADD, ON_TRIGGER_ENTER, ON_TRIGGER_EXIT, ON_UPDATE_ENTER, ON_UPDATE_EXIT,
};
use crate::geometry::{overlap_2d, AxisAlignedBox};
use crate::objects::{self, GameObject, ObjectError, ObjectEvent};
use crate::physics::Axis;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, trace, warn};

/// Errors raised by a [`CollisionWorld`]
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("invalid object kind `{0}`, expected `collider` or `trigger`")]
    InvalidKind(String),

    #[error("entity {0:?} is already registered")]
    AlreadyRegistered(Entity),

    #[error("entity {0:?} has no GameObject component")]
    MissingGameObject(Entity),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Event(#[from] EventError),
}

/// Stable identity of a registered object, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectHandle(pub(crate) u32);

impl ObjectHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How overlaps with an object are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Overlaps are resolved by moving objects apart
    Collider,
    /// Overlaps are only reported
    Trigger,
}

impl FromStr for ObjectKind {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collider" => Ok(ObjectKind::Collider),
            "trigger" => Ok(ObjectKind::Trigger),
            other => Err(WorldError::InvalidKind(other.to_string())),
        }
    }
}

impl TryFrom<i32> for ObjectKind {
    type Error = WorldError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ObjectKind::Collider),
            1 => Ok(ObjectKind::Trigger),
            other => Err(WorldError::InvalidKind(other.to_string())),
        }
    }
}

/// State of one registered object at the time of an update event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSnapshot {
    pub handle: ObjectHandle,
    pub entity: Entity,
    pub kind: ObjectKind,
    pub bounds: AxisAlignedBox,
}

/// Payload of world level events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    /// Sent on `on_update_enter` and `on_update_exit`
    Update {
        elapsed_ms: i32,
        objects: Vec<ObjectSnapshot>,
    },
    /// Sent on `on_collider_add` and `on_trigger_add`
    ObjectAdded {
        handle: ObjectHandle,
        entity: Entity,
        kind: ObjectKind,
    },
}

/// Work done by a single [`CollisionWorld::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Pairs that survived the broad phase
    pub candidate_pairs: usize,
    /// Collider pairs that overlapped and were resolved
    pub resolved_pairs: usize,
    /// Pairs involving a trigger that overlapped
    pub trigger_overlaps: usize,
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    entity: Entity,
    kind: ObjectKind,
}

/// Sweep-and-prune collision world
pub struct CollisionWorld {
    objects: Vec<Registration>,
    entity_to_handle: HashMap<Entity, ObjectHandle>,
    colliders: PositionalCollisionCache,
    triggers: CollisionCache,
    events: EventDispatcher<WorldEvent>,
    movement_threshold: i32,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::with_movement_threshold(1)
    }

    /// World that only reports a collider contact when resolving it changed
    /// the motion of an object by at least `threshold` on some axis
    pub fn with_movement_threshold(threshold: i32) -> Self {
        info!(threshold, "Initializing collision world");
        Self {
            movement_threshold: threshold,
            objects: Vec::new(),
            entity_to_handle: HashMap::new(),
            colliders: PositionalCollisionCache::new(),
            triggers: CollisionCache::new(),
            events: EventDispatcher::with_events(&[
                ON_UPDATE_ENTER,
                ON_UPDATE_EXIT,
                ON_COLLIDER_ADD,
                ON_TRIGGER_ADD,
            ]),
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::with_movement_threshold(config.movement_threshold)
    }

    pub fn movement_threshold(&self) -> i32 {
        self.movement_threshold
    }

    /// Attach a listener to one of the world events
    pub fn add_listener<F>(&mut self, name: &str, listener: F) -> Result<(), WorldError>
    where
        F: FnMut(&WorldEvent) + Send + Sync + 'static,
    {
        Ok(self.events.add_listener(name, listener)?)
    }

    /// Register an entity for collision handling.
    ///
    /// The entity must carry a [`GameObject`]. It stays registered for the
    /// lifetime of the world.
    pub fn register(
        &mut self,
        world: &World,
        entity: Entity,
        kind: ObjectKind,
    ) -> Result<ObjectHandle, WorldError> {
        if self.entity_to_handle.contains_key(&entity) {
            return Err(WorldError::AlreadyRegistered(entity));
        }
        if world.get::<&GameObject>(entity).is_err() {
            return Err(WorldError::MissingGameObject(entity));
        }

        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(Registration { entity, kind });
        self.entity_to_handle.insert(entity, handle);
        info!(%handle, ?entity, ?kind, "Registered object");

        let event = match kind {
            ObjectKind::Collider => ON_COLLIDER_ADD,
            ObjectKind::Trigger => ON_TRIGGER_ADD,
        };
        self.events.dispatch(
            event,
            &WorldEvent::ObjectAdded {
                handle,
                entity,
                kind,
            },
        )?;

        Ok(handle)
    }

    pub fn add_collider(&mut self, world: &World, entity: Entity) -> Result<ObjectHandle, WorldError> {
        self.register(world, entity, ObjectKind::Collider)
    }

    pub fn add_trigger(&mut self, world: &World, entity: Entity) -> Result<ObjectHandle, WorldError> {
        self.register(world, entity, ObjectKind::Trigger)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get_handle(&self, entity: Entity) -> Option<ObjectHandle> {
        self.entity_to_handle.get(&entity).copied()
    }

    pub fn get_entity(&self, handle: ObjectHandle) -> Option<Entity> {
        self.objects.get(handle.index()).map(|r| r.entity)
    }

    pub fn get_kind(&self, handle: ObjectHandle) -> Option<ObjectKind> {
        self.objects.get(handle.index()).map(|r| r.kind)
    }

    /// Whether two colliders are currently in contact
    pub fn is_colliding(&self, a: ObjectHandle, b: ObjectHandle) -> bool {
        self.colliders.is_colliding(a, b)
    }

    /// Whether a trigger pair currently overlaps
    pub fn is_triggered(&self, a: ObjectHandle, b: ObjectHandle) -> bool {
        self.triggers.is_colliding(a, b)
    }

    /// Current state of every registered object
    pub fn snapshot(&self, world: &World) -> Result<Vec<ObjectSnapshot>, WorldError> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, registration)| {
                Ok(ObjectSnapshot {
                    handle: ObjectHandle(index as u32),
                    entity: registration.entity,
                    kind: registration.kind,
                    bounds: bounds_of(world, registration.entity)?,
                })
            })
            .collect()
    }

    /// Process collisions between registered objects for one tick.
    ///
    /// Colliders are moved apart and triggers detected, then
    /// `on_collider_enter/exit` and `on_trigger_enter/exit` are dispatched to
    /// both members of every pair that started or stopped colliding. The
    /// first error abandons the rest of the tick.
    pub fn update(&mut self, world: &mut World, ms: i32) -> Result<SweepStats, WorldError> {
        if ms <= 0 {
            warn!(ms, "Collision world updated with a non-positive tick");
        }
        self.dispatch_update(world, ON_UPDATE_ENTER, ms)?;

        let mut order: Vec<usize> = (0..self.objects.len()).collect();
        let mut sweep = Sweep {
            objects: &self.objects,
            world: &mut *world,
            colliders: &mut self.colliders,
            triggers: &mut self.triggers,
            movement_threshold: self.movement_threshold,
            stats: SweepStats::default(),
        };
        sort_by_left_edge(&sweep, &mut order)?;
        let candidate_pairs = sweep_and_prune(&mut sweep, &order)?;
        let stats = SweepStats {
            candidate_pairs,
            ..sweep.stats
        };

        let objects = &self.objects;
        self.colliders.update(|handle| {
            objects
                .get(handle.index())
                .and_then(|r| world.get::<&GameObject>(r.entity).ok().map(|o| o.position()))
        });
        self.triggers.update();

        self.notify(world, ON_COLLIDER_ENTER, self.colliders.new_collisions())?;
        self.notify(world, ON_COLLIDER_EXIT, self.colliders.removed_collisions())?;
        self.notify(world, ON_TRIGGER_ENTER, self.triggers.new_collisions())?;
        self.notify(world, ON_TRIGGER_EXIT, self.triggers.removed_collisions())?;

        debug!(
            objects = self.objects.len(),
            candidates = stats.candidate_pairs,
            resolved = stats.resolved_pairs,
            triggers = stats.trigger_overlaps,
            "Collision world updated"
        );

        self.dispatch_update(world, ON_UPDATE_EXIT, ms)?;
        Ok(stats)
    }

    fn dispatch_update(&mut self, world: &World, name: &str, ms: i32) -> Result<(), WorldError> {
        if !self.events.has_listeners(name) {
            return Ok(());
        }
        let event = WorldEvent::Update {
            elapsed_ms: ms,
            objects: self.snapshot(world)?,
        };
        Ok(self.events.dispatch(name, &event)?)
    }

    fn notify(
        &self,
        world: &mut World,
        name: &str,
        pairs: &BTreeSet<CollisionPair>,
    ) -> Result<(), WorldError> {
        for pair in pairs {
            let first = self.objects[pair.first().index()].entity;
            let second = self.objects[pair.second().index()].entity;
            trace!(event = name, ?first, ?second, "Dispatching collision");
            objects::notify(world, first, name, &ObjectEvent::Collision(second))?;
            objects::notify(world, second, name, &ObjectEvent::Collision(first))?;
        }
        Ok(())
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CollisionWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionWorld")
            .field("objects", &self.objects.len())
            .field("colliding", &self.colliders.len())
            .field("triggered", &self.triggers.len())
            .finish()
    }
}

fn bounds_of(world: &World, entity: Entity) -> Result<AxisAlignedBox, WorldError> {
    world
        .get::<&GameObject>(entity)
        .map(|object| object.bounds)
        .map_err(|_| WorldError::MissingGameObject(entity))
}

fn object_of(world: &World, entity: Entity) -> Result<GameObject, WorldError> {
    world
        .get::<&GameObject>(entity)
        .map(|object| *object)
        .map_err(|_| WorldError::MissingGameObject(entity))
}

/// Borrowed state for one sweep
struct Sweep<'a> {
    objects: &'a [Registration],
    world: &'a mut World,
    colliders: &'a mut PositionalCollisionCache,
    triggers: &'a mut CollisionCache,
    movement_threshold: i32,
    stats: SweepStats,
}

impl Sweep<'_> {
    fn resolve_colliders(
        &mut self,
        a: ObjectHandle,
        b: ObjectHandle,
    ) -> Result<(), WorldError> {
        let a_entity = self.objects[a.index()].entity;
        let b_entity = self.objects[b.index()].entity;
        let mut first = object_of(&*self.world, a_entity)?;
        let mut second = object_of(&*self.world, b_entity)?;

        let Some(delta) = resolve_game_object_collision(&mut first, &mut second) else {
            return Ok(());
        };
        self.stats.resolved_pairs += 1;
        trace!(%a, %b, ?delta, "Resolved colliders");

        // A member attached below the other is written first, so the parent's
        // move puts it back at its attachment offset
        let writes = if objects::is_attached_to(&*self.world, b_entity, a_entity) {
            [(b_entity, second), (a_entity, first)]
        } else {
            [(a_entity, first), (b_entity, second)]
        };
        for (entity, resolved) in writes {
            if let Ok(mut object) = self.world.get::<&mut GameObject>(entity) {
                object.physics = resolved.physics;
            }
            objects::set_position(self.world, entity, resolved.position())?;
        }

        let threshold = self.movement_threshold;
        if !Axis::BOTH.into_iter().any(|axis| axis.of(delta).abs() >= threshold) {
            trace!(%a, %b, ?delta, threshold, "Correction below movement threshold");
            return Ok(());
        }
        self.colliders.add_collision(
            (a, bounds_of(&*self.world, a_entity)?.position()),
            (b, bounds_of(&*self.world, b_entity)?.position()),
            delta,
        );
        Ok(())
    }

    fn detect_trigger(&mut self, a: ObjectHandle, b: ObjectHandle) -> Result<(), WorldError> {
        let a_bounds = bounds_of(&*self.world, self.objects[a.index()].entity)?;
        let b_bounds = bounds_of(&*self.world, self.objects[b.index()].entity)?;
        if overlap_2d(&a_bounds, &b_bounds) {
            self.stats.trigger_overlaps += 1;
            trace!(%a, %b, "Trigger overlap");
            self.triggers.add_collision(a, b);
        }
        Ok(())
    }
}

impl SweepTarget for Sweep<'_> {
    type Error = WorldError;

    fn bounds(&self, index: usize) -> Result<AxisAlignedBox, WorldError> {
        bounds_of(&*self.world, self.objects[index].entity)
    }

    fn narrow_phase(&mut self, first: usize, second: usize) -> Result<(), WorldError> {
        // Lower handle first, so on a full tie the earlier registration moves
        let (a, b) = (first.min(second), first.max(second));
        let (a, b) = (ObjectHandle(a as u32), ObjectHandle(b as u32));

        let kinds = (self.objects[a.index()].kind, self.objects[b.index()].kind);
        match kinds {
            (ObjectKind::Collider, ObjectKind::Collider) => self.resolve_colliders(a, b),
            _ => self.detect_trigger(a, b),
        }
    }
}
