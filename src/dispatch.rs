//! Dispatching events on a node and bubbling them towards the root.
//!
//! There is no capture phase: an event first runs the listeners of the node it
//! was dispatched on, then, if it bubbles, the listeners of each ancestor in
//! turn until the root is reached or a listener stops it.
//!
//! Dispatch is a plain synchronous call chain. Listeners may add or remove
//! listeners and dispatch other events (or re-dispatch the current one) while
//! they run; every node iterates the listener sequence it had when the event
//! reached it, so such changes only affect later dispatches.

use std::rc::{Rc, Weak};

use tracing::trace;

use crate::dispatcher::{EventDispatcher, EventTarget};
use crate::event::pool::EventPool;
use crate::event::{Event, EventData, EventType};
use crate::listener::Listener;
use crate::registry::Listeners;

/// Dispatch operations for reference-counted event targets.
///
/// Implemented for `Rc<T>` of any [`EventTarget`] and for `Rc<dyn EventTarget>`.
pub trait DispatchExt {
    fn as_event_target(&self) -> Rc<dyn EventTarget>;

    fn event_dispatcher(&self) -> &EventDispatcher;

    /// Dispatch `event` on this node.
    ///
    /// A listener that panics aborts the rest of the dispatch; the panic is not
    /// caught here.
    fn dispatch_event(&self, event: &mut Event) {
        let listeners = self.event_dispatcher().listeners(event.event_type());
        if listeners.is_none() && !event.bubbles() {
            return;
        }
        dispatch_at(&self.as_event_target(), event, listeners);
    }

    /// Dispatch a pooled event built from the arguments.
    ///
    /// Nothing is acquired from the pool when the event would not reach a
    /// single listener on this node and does not bubble.
    fn dispatch_event_with(
        &self,
        event_type: impl Into<EventType>,
        bubbles: bool,
        data: Option<EventData>,
    ) {
        let event_type = event_type.into();
        if !bubbles && !self.event_dispatcher().has_event_listener(&event_type) {
            return;
        }
        let mut event = EventPool::acquire(event_type, bubbles, data);
        self.dispatch_event(&mut event);
    }

    /// Register `listener` for `event_type` until the returned handle is dropped.
    fn subscribe(&self, event_type: impl Into<EventType>, listener: &Listener) -> Subscription {
        let event_type = event_type.into();
        self.event_dispatcher()
            .add_event_listener(event_type.clone(), listener);
        Subscription {
            target: Some(Rc::downgrade(&self.as_event_target())),
            event_type,
            listener: listener.clone(),
        }
    }
}

impl<T: EventTarget> DispatchExt for Rc<T> {
    fn as_event_target(&self) -> Rc<dyn EventTarget> {
        self.clone()
    }

    fn event_dispatcher(&self) -> &EventDispatcher {
        self.dispatcher()
    }
}

impl DispatchExt for Rc<dyn EventTarget> {
    fn as_event_target(&self) -> Rc<dyn EventTarget> {
        self.clone()
    }

    fn event_dispatcher(&self) -> &EventDispatcher {
        self.dispatcher()
    }
}

fn dispatch_at(this: &Rc<dyn EventTarget>, event: &mut Event, listeners: Option<Listeners>) {
    // A set current target means the caller is dispatching an event that already
    // went through a dispatch. Our own bubble step clears it before recursing,
    // so the target chosen at the origin survives the climb.
    let previous_target = event.target.clone();
    if event.target.is_none() || event.current_target.is_some() {
        event.target = Some(this.clone());
    }

    if let Some(listeners) = listeners {
        trace!(
            event_type = %event.event_type,
            listeners = listeners.len(),
            "invoking listeners"
        );
        event.current_target = Some(this.clone());
        for entry in listeners.iter() {
            entry.invoke(event);
            if event.stops_immediate_propagation() {
                trace!(event_type = %event.event_type, "immediate propagation stopped");
                break;
            }
        }
    }

    if event.bubbles()
        && !event.stops_immediate_propagation()
        && !event.stops_propagation()
        && let Some(parent) = this.bubble_parent()
    {
        trace!(event_type = %event.event_type, "bubbling to parent");
        event.current_target = None;
        parent.dispatch_event(event);
    }

    if previous_target.is_some() {
        event.target = previous_target;
    }
}

/// A listener registration that is removed when this handle is dropped.
#[must_use = "dropping a subscription removes its listener"]
pub struct Subscription {
    target: Option<Weak<dyn EventTarget>>,
    event_type: EventType,
    listener: Listener,
}

impl Subscription {
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Keep the listener registered for as long as its node lives.
    pub fn forget(mut self) {
        self.target = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(target) = self.target.take().and_then(|target| target.upgrade()) {
            target
                .dispatcher()
                .remove_event_listener(&self.event_type, &self.listener);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_type", &self.event_type)
            .field("listener", &self.listener)
            .field("active", &self.target.is_some())
            .finish()
    }
}
