//! Listener handles and the entries the registry keeps for them.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::Event;

/// The callable kinds a listener can be built from, fixed at construction.
enum Callback {
    Bare(Box<dyn Fn()>),
    Event(Box<dyn Fn(&mut Event)>),
    EventData(Box<dyn Fn(&mut Event, Option<&dyn Any>)>),
}

/// A shareable event listener.
///
/// A listener's identity is its callable allocation: clones of the same
/// `Listener` are the same listener, two `Listener`s built from equal closures
/// are not. Keep a clone around to remove it later.
#[derive(Clone)]
pub struct Listener {
    callback: Rc<Callback>,
}

impl Listener {
    /// A listener that only wants to know that the event happened.
    pub fn bare(f: impl Fn() + 'static) -> Self {
        Self::from_callback(Callback::Bare(Box::new(f)))
    }

    pub fn new(f: impl Fn(&mut Event) + 'static) -> Self {
        Self::from_callback(Callback::Event(Box::new(f)))
    }

    /// A listener that receives the event and, separately, its payload.
    pub fn with_data(f: impl Fn(&mut Event, Option<&dyn Any>) + 'static) -> Self {
        Self::from_callback(Callback::EventData(Box::new(f)))
    }

    fn from_callback(callback: Callback) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn id(&self) -> ListenerId {
        ListenerId(Rc::as_ptr(&self.callback) as usize)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match *self.callback {
            Callback::Bare(_) => "bare",
            Callback::Event(_) => "event",
            Callback::EventData(_) => "event_data",
        };
        f.debug_struct("Listener")
            .field("id", &self.id())
            .field("kind", &kind)
            .finish()
    }
}

/// Identity of a [`Listener`], used for duplicate suppression and removal.
///
/// Only meaningful while the listener is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Whether a registration keeps its listener alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferencePolicy {
    /// The registry owns a clone of the listener.
    #[default]
    Strong,
    /// The registry only observes the listener. Once every [`Listener`] clone
    /// is dropped, the registration stops firing and is pruned.
    Weak,
}

#[derive(Clone)]
enum Slot {
    Strong(Rc<Callback>),
    Weak(Weak<Callback>),
}

/// One registration in a [`ListenerRegistry`](crate::registry::ListenerRegistry).
#[derive(Clone)]
pub struct ListenerEntry {
    id: ListenerId,
    slot: Slot,
}

impl ListenerEntry {
    pub(crate) fn new(listener: &Listener, policy: ReferencePolicy) -> Self {
        let slot = match policy {
            ReferencePolicy::Strong => Slot::Strong(listener.callback.clone()),
            ReferencePolicy::Weak => Slot::Weak(Rc::downgrade(&listener.callback)),
        };
        Self {
            id: listener.id(),
            slot,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn policy(&self) -> ReferencePolicy {
        match self.slot {
            Slot::Strong(_) => ReferencePolicy::Strong,
            Slot::Weak(_) => ReferencePolicy::Weak,
        }
    }

    /// Whether the listener can still be invoked.
    pub fn is_alive(&self) -> bool {
        match &self.slot {
            Slot::Strong(_) => true,
            Slot::Weak(weak) => weak.strong_count() > 0,
        }
    }

    /// Invoke the listener. A dropped weak listener is skipped.
    pub(crate) fn invoke(&self, event: &mut Event) {
        let callback = match &self.slot {
            Slot::Strong(callback) => callback.clone(),
            Slot::Weak(weak) => match weak.upgrade() {
                Some(callback) => callback,
                None => return,
            },
        };
        match &*callback {
            Callback::Bare(f) => f(),
            Callback::Event(f) => f(event),
            Callback::EventData(f) => {
                let data = event.data.clone();
                f(event, data.as_deref())
            }
        }
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("policy", &self.policy())
            .field("alive", &self.is_alive())
            .finish()
    }
}
