//! Named event dispatch with explicit registration
//!
//! Listeners can only be attached to event names that were registered on the
//! dispatcher first. Attaching to an unknown name is rejected immediately, so
//! a typo in an event name fails where the listener is added instead of
//! silently never firing.

use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

pub const ON_MOVE: &str = "on_move";
pub const ON_MOVE_RELATIVE: &str = "on_move_relative";
pub const ON_COLLIDER_ENTER: &str = "on_collider_enter";
pub const ON_COLLIDER_EXIT: &str = "on_collider_exit";
pub const ON_TRIGGER_ENTER: &str = "on_trigger_enter";
pub const ON_TRIGGER_EXIT: &str = "on_trigger_exit";
pub const ON_UPDATE_ENTER: &str = "on_update_enter";
pub const ON_UPDATE_EXIT: &str = "on_update_exit";
pub const ON_COLLIDER_ADD: &str = "on_collider_add";
pub const ON_TRIGGER_ADD: &str = "on_trigger_add";

/// Errors raised by an [`EventDispatcher`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("event `{0}` is not registered")]
    UnregisteredEvent(String),
}

type Listener<E> = Box<dyn FnMut(&E) + Send + Sync>;

/// Dispatches payloads of type `E` to listeners grouped by event name
pub struct EventDispatcher<E> {
    listeners: BTreeMap<String, Vec<Listener<E>>>,
}

impl<E> EventDispatcher<E> {
    /// Create a dispatcher with no registered events
    pub fn new() -> Self {
        Self {
            listeners: BTreeMap::new(),
        }
    }

    /// Create a dispatcher with the given events registered
    pub fn with_events(names: &[&str]) -> Self {
        let mut dispatcher = Self::new();
        for name in names {
            dispatcher.register_event(name);
        }
        dispatcher
    }

    /// Register an event name. Registering twice is harmless.
    pub fn register_event(&mut self, name: &str) {
        self.listeners.entry(name.to_string()).or_default();
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.listeners.contains_key(name)
    }

    /// Whether any listener is attached to `name`
    pub fn has_listeners(&self, name: &str) -> bool {
        self.listeners
            .get(name)
            .is_some_and(|listeners| !listeners.is_empty())
    }

    /// Attach a listener to a registered event
    pub fn add_listener<F>(&mut self, name: &str, listener: F) -> Result<(), EventError>
    where
        F: FnMut(&E) + Send + Sync + 'static,
    {
        let listeners = self
            .listeners
            .get_mut(name)
            .ok_or_else(|| EventError::UnregisteredEvent(name.to_string()))?;
        listeners.push(Box::new(listener));
        Ok(())
    }

    /// Run every listener attached to `name`, in attach order
    pub fn dispatch(&mut self, name: &str, payload: &E) -> Result<(), EventError> {
        let listeners = self
            .listeners
            .get_mut(name)
            .ok_or_else(|| EventError::UnregisteredEvent(name.to_string()))?;
        trace!(event = name, listeners = listeners.len(), "Dispatching event");
        for listener in listeners.iter_mut() {
            listener(payload);
        }
        Ok(())
    }
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(name, listeners)| (name.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("listeners", &counts)
            .finish()
    }
}
