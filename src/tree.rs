//! A minimal node tree that takes part in bubbling.
//!
//! Children are owned by their parent; the parent link is a back reference
//! used only to walk upwards.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::dispatch::DispatchExt;
use crate::dispatcher::{EventDispatcher, EventTarget};
use crate::event::{EventData, EventType, types};

pub struct Node {
    name: String,
    dispatcher: EventDispatcher,
    parent: RefCell<Weak<Node>>,
    children: RefCell<SmallVec<[Rc<Node>; 4]>>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            dispatcher: EventDispatcher::new(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(SmallVec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().upgrade()
    }

    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().to_vec()
    }

    pub fn num_children(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn child_by_name(&self, name: &str) -> Option<Rc<Node>> {
        self.children
            .borrow()
            .iter()
            .find(|child| child.name == name)
            .cloned()
    }

    /// The topmost ancestor, or this node if it has no parent.
    pub fn root(self: &Rc<Self>) -> Rc<Node> {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// Number of ancestors above this node.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut parent = self.parent();
        while let Some(node) = parent {
            depth += 1;
            parent = node.parent();
        }
        depth
    }

    /// Whether `other` is this node or one of its descendants.
    pub fn contains(self: &Rc<Self>, other: &Rc<Node>) -> bool {
        let mut node = Some(other.clone());
        while let Some(current) = node {
            if Rc::ptr_eq(&current, self) {
                return true;
            }
            node = current.parent();
        }
        false
    }

    /// Append `child`, detaching it from its current parent first, then
    /// dispatch a bubbling [`types::ADDED`] event on it.
    ///
    /// # Panics
    /// If `child` is this node or one of its ancestors.
    pub fn add_child(self: &Rc<Self>, child: &Rc<Node>) {
        let index = self.num_children();
        self.add_child_at(child, index);
    }

    /// Like [`Node::add_child`], inserting at `index` (clamped to the child count).
    pub fn add_child_at(self: &Rc<Self>, child: &Rc<Node>, index: usize) {
        assert!(
            !child.contains(self),
            "cannot add node `{}` as a child of itself or of its descendant `{}`",
            child.name,
            self.name
        );
        if let Some(previous) = child.parent() {
            previous.remove_child(child);
        }
        {
            let mut children = self.children.borrow_mut();
            let index = index.min(children.len());
            children.insert(index, child.clone());
        }
        *child.parent.borrow_mut() = Rc::downgrade(self);
        child.dispatch_event_with(types::ADDED, true, None);
    }

    /// Dispatch a bubbling [`types::REMOVED`] event on `child`, then detach it.
    ///
    /// Returns `false` if `child` is not a child of this node.
    pub fn remove_child(self: &Rc<Self>, child: &Rc<Node>) -> bool {
        if !self.has_child(child) {
            return false;
        }
        child.dispatch_event_with(types::REMOVED, true, None);

        // A listener may already have moved the child elsewhere.
        let removed = {
            let mut children = self.children.borrow_mut();
            match children.iter().position(|c| Rc::ptr_eq(c, child)) {
                Some(index) => Some(children.remove(index)),
                None => None,
            }
        };
        if removed.is_some() {
            *child.parent.borrow_mut() = Weak::new();
        }
        removed.is_some()
    }

    pub fn remove_from_parent(self: &Rc<Self>) -> bool {
        match self.parent() {
            Some(parent) => parent.remove_child(self),
            None => false,
        }
    }

    /// Dispatch a non-bubbling pooled event on this node and every descendant,
    /// parents before children.
    ///
    /// The set of nodes is fixed before the first listener runs.
    pub fn broadcast_event_with(
        self: &Rc<Self>,
        event_type: impl Into<EventType>,
        data: Option<EventData>,
    ) {
        let event_type = event_type.into();
        let mut nodes = Vec::new();
        self.collect_subtree(&mut nodes);
        for node in nodes {
            node.dispatch_event_with(event_type.clone(), false, data.clone());
        }
    }

    fn has_child(&self, child: &Rc<Node>) -> bool {
        self.children.borrow().iter().any(|c| Rc::ptr_eq(c, child))
    }

    fn collect_subtree(self: &Rc<Self>, nodes: &mut Vec<Rc<Node>>) {
        nodes.push(self.clone());
        for child in self.children() {
            child.collect_subtree(nodes);
        }
    }
}

impl EventTarget for Node {
    fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    fn bubble_parent(&self) -> Option<Rc<dyn EventTarget>> {
        self.parent().map(|parent| parent as Rc<dyn EventTarget>)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("children", &self.children.borrow().len())
            .finish()
    }
}
