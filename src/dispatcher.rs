//! The per-node listener owner and the capability trait nodes implement.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::event::EventType;
use crate::listener::{Listener, ListenerEntry, ReferencePolicy};
use crate::registry::{ListenerRegistry, Listeners};

/// Something events can be dispatched on.
///
/// Nodes embed an [`EventDispatcher`] and hand it out here. Nodes that live in
/// a tree also report their parent through [`EventTarget::bubble_parent`] so
/// bubbling events can travel upwards; leaving the default makes the node a
/// standalone dispatcher that bubbling stops at.
pub trait EventTarget: Any {
    fn dispatcher(&self) -> &EventDispatcher;

    /// The node a bubbling event continues to after this one, if any.
    fn bubble_parent(&self) -> Option<Rc<dyn EventTarget>> {
        None
    }
}

/// Owns the listener registrations of one node.
///
/// The registry is only allocated once the first listener is added, so nodes
/// that never get listeners pay for nothing beyond this struct.
#[derive(Default)]
pub struct EventDispatcher {
    registry: RefCell<Option<ListenerRegistry>>,
}

impl EventDispatcher {
    pub const fn new() -> Self {
        Self {
            registry: RefCell::new(None),
        }
    }

    /// Register `listener` for `event_type`, keeping it alive.
    ///
    /// Adding a listener that is already registered for that type does nothing.
    pub fn add_event_listener(&self, event_type: impl Into<EventType>, listener: &Listener) {
        self.add_event_listener_with_policy(event_type, listener, ReferencePolicy::Strong);
    }

    pub fn add_event_listener_with_policy(
        &self,
        event_type: impl Into<EventType>,
        listener: &Listener,
        policy: ReferencePolicy,
    ) {
        self.registry
            .borrow_mut()
            .get_or_insert_with(ListenerRegistry::new)
            .add(event_type, listener, policy);
    }

    /// Unregister `listener` for `event_type`. Unknown listeners are ignored.
    pub fn remove_event_listener(&self, event_type: &str, listener: &Listener) {
        if let Some(registry) = self.registry.borrow_mut().as_mut() {
            registry.remove(event_type, listener);
        }
    }

    /// Unregister every listener for `event_type`, or every listener on this
    /// node when `None`.
    pub fn remove_event_listeners(&self, event_type: Option<&str>) {
        match event_type {
            // Dropped outside the borrow: listeners may own things that
            // touch this dispatcher when they go away.
            Some(event_type) => {
                let removed = self
                    .registry
                    .borrow_mut()
                    .as_mut()
                    .map(|registry| registry.remove_all(Some(event_type)));
                drop(removed);
            }
            None => drop(self.registry.take()),
        }
    }

    pub fn has_event_listener(&self, event_type: &str) -> bool {
        self.registry
            .borrow()
            .as_ref()
            .is_some_and(|registry| registry.has(event_type))
    }

    /// Whether this specific listener is registered for `event_type`.
    pub fn has_event_listener_for(&self, event_type: &str, listener: &Listener) -> bool {
        self.registry
            .borrow()
            .as_ref()
            .is_some_and(|registry| registry.contains(event_type, listener))
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry
            .borrow()
            .as_ref()
            .map_or(0, |registry| registry.count(event_type))
    }

    /// The listeners a dispatch of `event_type` would invoke right now, or
    /// `None` when there are none. Never allocates a registry.
    pub(crate) fn listeners(&self, event_type: &str) -> Option<Listeners> {
        let registry = self.registry.borrow();
        let listeners = registry.as_ref()?.snapshot(event_type);
        listeners
            .iter()
            .any(ListenerEntry::is_alive)
            .then_some(listeners)
    }

    /// Whether a listener has ever been added since the registry was last discarded.
    pub fn has_registry(&self) -> bool {
        self.registry.borrow().is_some()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registry", &self.registry.borrow())
            .finish()
    }
}
