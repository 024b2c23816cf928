//! Per-dispatcher mapping from event type to its ordered listeners.
//!
//! Every sequence is a persistent [`imbl::Vector`]: mutations build a new
//! vector and swap it into the map, so a [snapshot](ListenerRegistry::snapshot)
//! taken by an in-flight dispatch keeps iterating exactly what was registered
//! when the dispatch reached this node.

use imbl::Vector;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::event::EventType;
use crate::listener::{Listener, ListenerEntry, ReferencePolicy};

/// The listeners registered for one event type, in invocation order.
pub type Listeners = Vector<ListenerEntry>;

#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: FxHashMap<EventType, Listeners>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the sequence for `event_type`.
    ///
    /// Returns `false` without changing anything if the same listener is
    /// already registered for that type.
    pub fn add(
        &mut self,
        event_type: impl Into<EventType>,
        listener: &Listener,
        policy: ReferencePolicy,
    ) -> bool {
        let event_type = event_type.into();
        let id = listener.id();
        let mut next = match self.listeners.get(&*event_type) {
            Some(current) => {
                if current.iter().any(|entry| entry.id() == id) {
                    debug!(event_type = %event_type, ?id, "listener already registered");
                    return false;
                }
                let mut next = current.clone();
                next.retain(ListenerEntry::is_alive);
                next
            }
            None => Vector::new(),
        };
        next.push_back(ListenerEntry::new(listener, policy));
        self.listeners.insert(event_type, next);
        true
    }

    /// Remove `listener` from the sequence for `event_type`, dropping the type
    /// altogether once nothing is left. Returns whether it was registered.
    pub fn remove(&mut self, event_type: &str, listener: &Listener) -> bool {
        let id = listener.id();
        let Some(current) = self.listeners.get(event_type) else {
            return false;
        };
        if !current.iter().any(|entry| entry.id() == id) {
            return false;
        }
        let mut next = current.clone();
        next.retain(|entry| entry.id() != id && entry.is_alive());
        if next.is_empty() {
            self.listeners.remove(event_type);
        } else if let Some(slot) = self.listeners.get_mut(event_type) {
            *slot = next;
        }
        true
    }

    /// Take the listeners for `event_type`, or every listener when `None`.
    ///
    /// The removed sequences may hold the last reference to their listeners,
    /// so they are handed back for the caller to drop.
    #[must_use]
    pub fn remove_all(&mut self, event_type: Option<&str>) -> Vec<Listeners> {
        match event_type {
            Some(event_type) => self.listeners.remove(event_type).into_iter().collect(),
            None => self.listeners.drain().map(|(_, listeners)| listeners).collect(),
        }
    }

    /// Whether any live listener is registered for `event_type`.
    pub fn has(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .is_some_and(|listeners| listeners.iter().any(ListenerEntry::is_alive))
    }

    pub fn contains(&self, event_type: &str, listener: &Listener) -> bool {
        let id = listener.id();
        self.listeners.get(event_type).is_some_and(|listeners| {
            listeners
                .iter()
                .any(|entry| entry.id() == id && entry.is_alive())
        })
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.listeners.get(event_type).map_or(0, |listeners| {
            listeners.iter().filter(|entry| entry.is_alive()).count()
        })
    }

    /// The sequence for `event_type` as it is right now; empty if there is none.
    ///
    /// Later mutations of the registry never show up in the returned value.
    pub fn snapshot(&self, event_type: &str) -> Listeners {
        self.listeners.get(event_type).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// The event types with at least one registration, in no particular order.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.listeners.keys().map(|event_type| &**event_type)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.listeners
                    .iter()
                    .map(|(event_type, listeners)| (event_type, listeners.len())),
            )
            .finish()
    }
}
