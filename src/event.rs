//! The event object carried through a dispatch.
//!
//! An [`Event`] is created by the caller (or borrowed from the [pool](pool)) and
//! then mutated by the dispatch algorithm as it travels from the node it was
//! dispatched on towards the root. `target` and `current_target` are owned by
//! the dispatch algorithm; listeners only read them.

pub mod pool;
pub mod types;

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::dispatcher::EventTarget;

/// Key used to match an event with its listeners.
///
/// Constant types are borrowed so that dispatching them never allocates.
pub type EventType = Cow<'static, str>;

/// Optional payload attached to an event.
pub type EventData = Rc<dyn Any>;

bitflags! {
    /// Cooperative stop requests set by listeners and honored by the dispatcher.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    #[must_use]
    pub struct PropagationFlags: u8 {
        /// Do not bubble past the current node.
        const STOP = 1;
        /// Do not invoke any further listener, here or on an ancestor.
        const STOP_IMMEDIATE = 1 << 1;
    }
}

/// A typed notification travelling from its target towards the root.
pub struct Event {
    pub(crate) event_type: EventType,
    pub(crate) bubbles: bool,
    pub(crate) data: Option<EventData>,
    pub(crate) target: Option<Rc<dyn EventTarget>>,
    pub(crate) current_target: Option<Rc<dyn EventTarget>>,
    pub(crate) flags: PropagationFlags,
}

impl Event {
    /// Create a fresh event. Prefer [`DispatchExt::dispatch_event_with`](crate::DispatchExt::dispatch_event_with)
    /// for fire-and-forget events, which reuses pooled instances.
    pub fn new(event_type: impl Into<EventType>, bubbles: bool, data: Option<EventData>) -> Self {
        let event_type = event_type.into();
        debug_assert!(!event_type.is_empty(), "event type must not be empty");
        Self {
            event_type,
            bubbles,
            data,
            target: None,
            current_target: None,
            flags: PropagationFlags::empty(),
        }
    }

    /// A non-bubbling event without payload.
    pub fn simple(event_type: impl Into<EventType>) -> Self {
        Self::new(event_type, false, None)
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_data(mut self, data: impl Any) -> Self {
        self.data = Some(Rc::new(data));
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn data(&self) -> Option<&dyn Any> {
        self.data.as_deref()
    }

    /// The payload downcast to `T`, if there is one of that type.
    pub fn data_as<T: Any>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref()
    }

    /// The node this event was first accepted by.
    pub fn target(&self) -> Option<&Rc<dyn EventTarget>> {
        self.target.as_ref()
    }

    /// The node currently invoking its listeners.
    ///
    /// Cleared before every bubble step, and left as is once dispatch returns.
    pub fn current_target(&self) -> Option<&Rc<dyn EventTarget>> {
        self.current_target.as_ref()
    }

    pub fn target_as<T: EventTarget>(&self) -> Option<Rc<T>> {
        downcast_target(self.target.as_ref()?)
    }

    pub fn current_target_as<T: EventTarget>(&self) -> Option<Rc<T>> {
        downcast_target(self.current_target.as_ref()?)
    }

    /// Whether `node` is this event's target.
    pub fn is_target<T: EventTarget + ?Sized>(&self, node: &Rc<T>) -> bool {
        self.target.as_ref().is_some_and(|t| same_target(t, node))
    }

    /// Whether `node` is currently invoking its listeners for this event.
    pub fn is_current_target<T: EventTarget + ?Sized>(&self, node: &Rc<T>) -> bool {
        self.current_target
            .as_ref()
            .is_some_and(|t| same_target(t, node))
    }

    pub fn flags(&self) -> PropagationFlags {
        self.flags
    }

    /// Finish the listeners on the current node, then stop bubbling.
    pub fn stop_propagation(&mut self) {
        self.flags.insert(PropagationFlags::STOP);
    }

    /// Stop right after the running listener. Implies [`Event::stop_propagation`].
    pub fn stop_immediate_propagation(&mut self) {
        self.flags
            .insert(PropagationFlags::STOP | PropagationFlags::STOP_IMMEDIATE);
    }

    pub fn stops_propagation(&self) -> bool {
        self.flags.contains(PropagationFlags::STOP)
    }

    pub fn stops_immediate_propagation(&self) -> bool {
        self.flags.contains(PropagationFlags::STOP_IMMEDIATE)
    }

    /// Reinitialize this instance as a new event, dropping every reference it held.
    pub fn reset(
        &mut self,
        event_type: impl Into<EventType>,
        bubbles: bool,
        data: Option<EventData>,
    ) {
        self.event_type = event_type.into();
        self.bubbles = bubbles;
        self.data = data;
        self.target = None;
        self.current_target = None;
        self.flags = PropagationFlags::empty();
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("bubbles", &self.bubbles)
            .field("has_data", &self.data.is_some())
            .field("has_target", &self.target.is_some())
            .field("has_current_target", &self.current_target.is_some())
            .field("flags", &self.flags)
            .finish()
    }
}

pub(crate) fn same_target<T: EventTarget + ?Sized>(a: &Rc<dyn EventTarget>, b: &Rc<T>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

fn downcast_target<T: EventTarget>(target: &Rc<dyn EventTarget>) -> Option<Rc<T>> {
    let any: Rc<dyn Any> = target.clone();
    any.downcast().ok()
}
