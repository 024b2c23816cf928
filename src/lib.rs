//! # Sprig
//! Sprig is a small publish/subscribe event dispatcher for trees of nodes.
//!
//! Every node owns an [`EventDispatcher`] that maps event types to an ordered
//! list of [`Listener`]s. Dispatching an [`Event`] on a node runs that node's
//! listeners and, for bubbling events, continues with each ancestor up to the
//! root. There is no capture phase.
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use sprig::prelude::*;
//!
//! let root = Node::new("root");
//! let child = Node::new("child");
//! root.add_child(&child);
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! for node in [&root, &child] {
//!     let log = log.clone();
//!     let name = node.name().to_string();
//!     node.dispatcher()
//!         .add_event_listener("ping", &Listener::bare(move || log.borrow_mut().push(name.clone())));
//! }
//!
//! child.dispatch_event_with("ping", true, None);
//! assert_eq!(*log.borrow(), ["child", "root"]);
//! ```
//!
//! ## Nodes
//! Any type can receive events by implementing [`EventTarget`]. Returning a
//! parent from [`EventTarget::bubble_parent`] lets bubbling events continue
//! upwards; [`tree::Node`] is a ready-made implementation.
//!
//! ## Listeners
//! A [`Listener`] is created once and registered by reference. Registering the
//! same listener twice for a type is ignored, and removing it later needs the
//! same listener (or a clone of it). Listeners added or removed while an event
//! is being dispatched only take effect for later dispatches.
//!
//! Listeners registered with [`ReferencePolicy::Weak`] do not keep their
//! callable alive. [`DispatchExt::subscribe`] returns a [`Subscription`] that
//! unregisters its listener when dropped.
//!
//! ## Stopping
//! [`Event::stop_propagation`] lets the remaining listeners of the current node
//! run but keeps the event from reaching the parent.
//! [`Event::stop_immediate_propagation`] stops right after the running listener.
//!
//! ## Pooling
//! [`DispatchExt::dispatch_event_with`] borrows its event from a thread-local
//! [`EventPool`] and returns it afterwards, even if a listener panics. When the
//! node has no listener for a non-bubbling event nothing is borrowed at all.

pub mod dispatch;
pub mod dispatcher;
pub mod event;
pub mod listener;
pub mod registry;
pub mod tree;

pub use dispatch::{DispatchExt, Subscription};
pub use dispatcher::{EventDispatcher, EventTarget};
pub use event::pool::{EventPool, PoolStats, PooledEvent};
pub use event::{Event, EventData, EventType, PropagationFlags};
pub use listener::{Listener, ListenerId, ReferencePolicy};
pub use registry::ListenerRegistry;

pub mod prelude {
    pub use crate::dispatch::{DispatchExt, Subscription};
    pub use crate::dispatcher::{EventDispatcher, EventTarget};
    pub use crate::event::{Event, types};
    pub use crate::listener::{Listener, ReferencePolicy};
    pub use crate::tree::Node;
}
