//! Testing utilities for Sprig event dispatch.
//!
//! # Example
//!
//! ```rust
//! use sprig_test::prelude::*;
//!
//! let log = CallLog::new();
//! let [root, child] = chain(["root", "child"]);
//!
//! log.track(&root, "ping");
//! log.track(&child, "ping");
//!
//! child.dispatch_event_with("ping", true, None);
//! assert_eq!(log.names(), ["child", "root"]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use sprig::prelude::*;

/// Prelude module for convenient imports in tests.
pub mod prelude {
    pub use super::{CallLog, Then, chain, tree};
    pub use sprig::prelude::*;
    pub use sprig::{EventPool, PoolStats};
}

/// What a tracked listener does after recording its call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Then {
    Continue,
    StopPropagation,
    StopImmediatePropagation,
}

/// Records listener invocations by name, in call order.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records `name` each time it runs.
    pub fn listener(&self, name: &str) -> Listener {
        self.listener_then(name, Then::Continue)
    }

    /// A listener that records `name`, then applies `then` to the event.
    pub fn listener_then(&self, name: &str, then: Then) -> Listener {
        let calls = self.calls.clone();
        let name = name.to_string();
        Listener::new(move |event| {
            calls.borrow_mut().push(name.clone());
            match then {
                Then::Continue => {}
                Then::StopPropagation => event.stop_propagation(),
                Then::StopImmediatePropagation => event.stop_immediate_propagation(),
            }
        })
    }

    /// Register a recording listener named after the node and return it.
    pub fn track(&self, node: &Rc<Node>, event_type: &'static str) -> Listener {
        self.track_named(node, event_type, node.name())
    }

    pub fn track_named(&self, node: &Rc<Node>, event_type: &'static str, name: &str) -> Listener {
        let listener = self.listener(name);
        node.dispatcher().add_event_listener(event_type, &listener);
        listener
    }

    pub fn track_then(&self, node: &Rc<Node>, event_type: &'static str, then: Then) -> Listener {
        let listener = self.listener_then(node.name(), then);
        node.dispatcher().add_event_listener(event_type, &listener);
        listener
    }

    /// Record an arbitrary entry, e.g. from a hand-written listener.
    pub fn push(&self, entry: impl Into<String>) {
        self.calls.borrow_mut().push(entry.into());
    }

    pub fn names(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Build a single-path tree, root first: every node is the parent of the next.
pub fn chain<const N: usize>(names: [&str; N]) -> [Rc<Node>; N] {
    let nodes = names.map(|name| Node::new(name));
    for pair in nodes.windows(2) {
        pair[0].add_child(&pair[1]);
    }
    nodes
}

/// Build `root` with one child per entry of `children`, returning the children
/// in order.
pub fn tree(root: &Rc<Node>, children: &[&str]) -> SmallVec<[Rc<Node>; 4]> {
    children
        .iter()
        .map(|name| {
            let child = Node::new(*name);
            root.add_child(&child);
            child
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_links_every_pair() {
        let [a, b, c] = chain(["a", "b", "c"]);
        assert!(Rc::ptr_eq(&c.root(), &a));
        assert_eq!(b.depth(), 1);
        assert_eq!(c.depth(), 2);
    }
}
