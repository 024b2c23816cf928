//! Event types shared across node trees.
//!
//! Any string can be used as an event type; these are the ones the library
//! itself dispatches or that most trees end up needing.

/// Dispatched at a node right after it was attached to a parent. Bubbles.
pub const ADDED: &str = "added";
/// Dispatched at a node right before it is detached from its parent. Bubbles.
pub const REMOVED: &str = "removed";
/// A node became reachable from a root that is considered live.
pub const ADDED_TO_STAGE: &str = "addedToStage";
/// A node stopped being reachable from a live root.
pub const REMOVED_FROM_STAGE: &str = "removedFromStage";
/// A control was activated, e.g. a button press.
pub const TRIGGERED: &str = "triggered";
pub const CHANGE: &str = "change";
pub const COMPLETE: &str = "complete";
pub const CANCEL: &str = "cancel";
pub const CLOSE: &str = "close";
pub const OPEN: &str = "open";
pub const SELECT: &str = "select";
pub const UPDATE: &str = "update";
/// Once per frame, on every node of a live tree.
pub const ENTER_FRAME: &str = "enterFrame";
