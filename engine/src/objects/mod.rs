//! Game object components and the operations that move them
//!
//! A game object is any `hecs` entity with a [`GameObject`] component. The
//! engine never spawns or despawns them. Moves go through [`set_position`]
//! so that listeners see exactly one notification per move and attached
//! objects follow their parent.

use crate::events::{
    EventDispatcher, EventError, ON_COLLIDER_ENTER, ON_COLLIDER_EXIT, ON_MOVE, ON_MOVE_RELATIVE,
    ON_TRIGGER_ENTER, ON_TRIGGER_EXIT,
};
use crate::geometry::{AxisAlignedBox, Vector2};
use crate::physics::EntityPhysics;
use hecs::{Entity, QueryOneError, World};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Errors raised while operating on game objects
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    #[error("entity {0:?} has no GameObject component")]
    MissingGameObject(Entity),

    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    AttachmentCycle { parent: Entity, child: Entity },

    #[error(transparent)]
    Event(#[from] EventError),
}

impl ObjectError {
    fn from_query(entity: Entity, error: QueryOneError) -> Self {
        match error {
            QueryOneError::NoSuchEntity => ObjectError::NoSuchEntity(entity),
            QueryOneError::Unsatisfied => ObjectError::MissingGameObject(entity),
        }
    }
}

/// Bounding box plus optional physics of a game object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObject {
    pub bounds: AxisAlignedBox,
    pub physics: EntityPhysics,
}

impl GameObject {
    pub fn new(bounds: AxisAlignedBox, physics: impl Into<EntityPhysics>) -> Self {
        Self {
            bounds,
            physics: physics.into(),
        }
    }

    /// An object that collision resolution never moves
    pub fn immovable(bounds: AxisAlignedBox) -> Self {
        Self::new(bounds, EntityPhysics::Immovable)
    }

    pub fn x(&self) -> i32 {
        self.bounds.x()
    }

    pub fn y(&self) -> i32 {
        self.bounds.y()
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn position(&self) -> Vector2 {
        self.bounds.position()
    }

    pub fn velocity(&self) -> Vector2 {
        self.physics.velocity()
    }

    /// Swap to a box of a different size at the current position
    pub fn set_geometry(&mut self, width: i32, height: i32) {
        self.bounds = self.bounds.resized(width, height);
    }
}

/// Payload delivered to object listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectEvent {
    /// New absolute position
    Moved(Vector2),
    /// Offset from the previous position
    MovedRelative(Vector2),
    /// The other object of a collision pair
    Collision(Entity),
}

/// Listeners of a single game object
#[derive(Debug)]
pub struct ObjectEvents {
    dispatcher: EventDispatcher<ObjectEvent>,
}

impl ObjectEvents {
    pub fn new() -> Self {
        Self {
            dispatcher: EventDispatcher::with_events(&[
                ON_MOVE,
                ON_MOVE_RELATIVE,
                ON_COLLIDER_ENTER,
                ON_COLLIDER_EXIT,
                ON_TRIGGER_ENTER,
                ON_TRIGGER_EXIT,
            ]),
        }
    }

    pub fn add_listener<F>(&mut self, name: &str, listener: F) -> Result<(), EventError>
    where
        F: FnMut(&ObjectEvent) + Send + Sync + 'static,
    {
        self.dispatcher.add_listener(name, listener)
    }

    /// Builder-style [`ObjectEvents::add_listener`]
    pub fn with_listener<F>(mut self, name: &str, listener: F) -> Result<Self, EventError>
    where
        F: FnMut(&ObjectEvent) + Send + Sync + 'static,
    {
        self.add_listener(name, listener)?;
        Ok(self)
    }

    pub fn dispatch(&mut self, name: &str, event: &ObjectEvent) -> Result<(), EventError> {
        self.dispatcher.dispatch(name, event)
    }
}

impl Default for ObjectEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A child that follows its parent at a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub entity: Entity,
    pub offset: Vector2,
}

/// Children attached to an object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    children: Vec<Attachment>,
}

impl Attachments {
    pub fn children(&self) -> &[Attachment] {
        &self.children
    }
}

/// Parent of an attached object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachedTo(pub Entity);

/// Move an object as a single step.
///
/// Dispatches `on_move` and `on_move_relative` once and moves every attached
/// child along. Returns `false` without notifying anyone when the object is
/// already at `position`.
pub fn set_position(
    world: &mut World,
    entity: Entity,
    position: Vector2,
) -> Result<bool, ObjectError> {
    let (object, events) = world
        .query_one_mut::<(&mut GameObject, Option<&mut ObjectEvents>)>(entity)
        .map_err(|e| ObjectError::from_query(entity, e))?;

    let previous = object.position();
    if previous == position {
        return Ok(false);
    }
    object.bounds.set_position(position);

    let delta = position.sub(previous);
    trace!(?entity, ?position, ?delta, "Object moved");
    if let Some(events) = events {
        events.dispatch(ON_MOVE, &ObjectEvent::Moved(position))?;
        events.dispatch(ON_MOVE_RELATIVE, &ObjectEvent::MovedRelative(delta))?;
    }

    let children = world
        .get::<&Attachments>(entity)
        .map(|attachments| attachments.children.clone())
        .unwrap_or_default();
    for child in children {
        set_position(world, child.entity, position.add(child.offset))?;
    }

    Ok(true)
}

/// Move an object by an offset, see [`set_position`]
pub fn move_by(world: &mut World, entity: Entity, delta: Vector2) -> Result<bool, ObjectError> {
    let position = world
        .get::<&GameObject>(entity)
        .map_err(|_| missing(world, entity))?
        .position();
    set_position(world, entity, position.add(delta))
}

/// Deliver an event to an object's listeners, if it has any
pub fn notify(
    world: &mut World,
    entity: Entity,
    name: &str,
    event: &ObjectEvent,
) -> Result<(), ObjectError> {
    let events = world
        .query_one_mut::<Option<&mut ObjectEvents>>(entity)
        .map_err(|e| ObjectError::from_query(entity, e))?;
    if let Some(events) = events {
        events.dispatch(name, event)?;
    }
    Ok(())
}

/// Attach `child` to `parent` at their current relative offset.
///
/// A child has at most one parent; attaching it again replaces the old
/// relation.
pub fn attach(world: &mut World, parent: Entity, child: Entity) -> Result<(), ObjectError> {
    if parent == child || is_attached_to(world, parent, child) {
        return Err(ObjectError::AttachmentCycle { parent, child });
    }

    let parent_position = position_of(world, parent)?;
    let child_position = position_of(world, child)?;

    detach(world, child)?;

    let attachment = Attachment {
        entity: child,
        offset: child_position.sub(parent_position),
    };
    let attached = match world.get::<&mut Attachments>(parent) {
        Ok(mut attachments) => {
            attachments.children.push(attachment);
            true
        }
        Err(_) => false,
    };
    if !attached {
        world
            .insert_one(
                parent,
                Attachments {
                    children: vec![attachment],
                },
            )
            .map_err(|_| ObjectError::NoSuchEntity(parent))?;
    }
    world
        .insert_one(child, AttachedTo(parent))
        .map_err(|_| ObjectError::NoSuchEntity(child))?;

    trace!(?parent, ?child, offset = ?attachment.offset, "Attached object");
    Ok(())
}

/// Remove `child` from its parent. Returns whether it was attached.
pub fn detach(world: &mut World, child: Entity) -> Result<bool, ObjectError> {
    if !world.contains(child) {
        return Err(ObjectError::NoSuchEntity(child));
    }
    let Ok(AttachedTo(parent)) = world.remove_one::<AttachedTo>(child) else {
        return Ok(false);
    };
    if let Ok(mut attachments) = world.get::<&mut Attachments>(parent) {
        attachments.children.retain(|a| a.entity != child);
    }
    Ok(true)
}

/// Whether `entity` hangs below `ancestor`, directly or through other
/// attachments
pub fn is_attached_to(world: &World, entity: Entity, ancestor: Entity) -> bool {
    let parent_of = |e: Entity| world.get::<&AttachedTo>(e).ok().map(|to| to.0);
    let mut current = parent_of(entity);
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = parent_of(parent);
    }
    false
}

fn position_of(world: &World, entity: Entity) -> Result<Vector2, ObjectError> {
    world
        .get::<&GameObject>(entity)
        .map(|object| object.position())
        .map_err(|_| missing(world, entity))
}

fn missing(world: &World, entity: Entity) -> ObjectError {
    if world.contains(entity) {
        ObjectError::MissingGameObject(entity)
    } else {
        ObjectError::NoSuchEntity(entity)
    }
}
