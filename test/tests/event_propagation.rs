//! Tests for bubbling and for the two ways of stopping it.
//!
//! These tests verify that:
//! - a bubbling event runs the target's listeners, then each ancestor's in turn
//! - `stop_propagation` lets the current node finish but keeps parents out
//! - `stop_immediate_propagation` stops right after the running listener

use sprig_test::prelude::*;

#[test]
fn test_bubbles_from_target_to_root() {
    let log = CallLog::new();
    let [a, b, c] = chain(["A", "B", "C"]);
    log.track(&a, "ping");
    log.track(&b, "ping");
    log.track(&c, "ping");

    c.dispatch_event_with("ping", true, None);

    assert_eq!(log.names(), ["C", "B", "A"]);
}

#[test]
fn test_non_bubbling_event_stays_on_target() {
    let log = CallLog::new();
    let [a, b] = chain(["A", "B"]);
    log.track(&a, "ping");
    log.track(&b, "ping");

    b.dispatch_event_with("ping", false, None);

    assert_eq!(log.names(), ["B"]);
}

#[test]
fn test_each_node_finishes_its_list_before_bubbling() {
    let log = CallLog::new();
    let [parent, child] = chain(["parent", "child"]);
    log.track_named(&parent, "ping", "parent-1");
    log.track_named(&parent, "ping", "parent-2");
    log.track_named(&child, "ping", "child-1");
    log.track_named(&child, "ping", "child-2");

    child.dispatch_event_with("ping", true, None);

    assert_eq!(
        log.names(),
        ["child-1", "child-2", "parent-1", "parent-2"]
    );
}

#[test]
fn test_stop_propagation_finishes_current_node() {
    let log = CallLog::new();
    let [parent, child] = chain(["parent", "child"]);
    log.track(&parent, "ping");
    log.track_then(&child, "ping", Then::StopPropagation);
    log.track_named(&child, "ping", "child-after");

    child.dispatch_event_with("ping", true, None);

    assert_eq!(log.names(), ["child", "child-after"]);
}

#[test]
fn test_stop_immediate_propagation_stops_everything() {
    let log = CallLog::new();
    let [parent, child] = chain(["parent", "child"]);
    log.track(&parent, "ping");
    log.track_then(&child, "ping", Then::StopImmediatePropagation);
    log.track_named(&child, "ping", "child-after");

    child.dispatch_event_with("ping", true, None);

    assert_eq!(log.names(), ["child"]);
}

#[test]
fn test_stop_in_ancestor_keeps_grandparent_out() {
    let log = CallLog::new();
    let [root, middle, leaf] = chain(["root", "middle", "leaf"]);
    log.track(&root, "ping");
    log.track_then(&middle, "ping", Then::StopPropagation);
    log.track(&leaf, "ping");

    leaf.dispatch_event_with("ping", true, None);

    assert_eq!(log.names(), ["leaf", "middle"]);
}

#[test]
fn test_bubbling_without_listeners_reaches_root_quietly() {
    let [root, _, _, leaf] = chain(["root", "a", "b", "leaf"]);
    let mut event = Event::new("ping", true, None);

    leaf.dispatch_event(&mut event);

    assert!(event.is_target(&leaf));
    assert!(event.current_target().is_none());
    assert!(root.parent().is_none());
}

#[test]
fn test_target_is_origin_at_every_level() {
    let log = CallLog::new();
    let [root, leaf] = chain(["root", "leaf"]);
    for node in [&root, &leaf] {
        let log = log.clone();
        let name = node.name().to_string();
        node.dispatcher().add_event_listener(
            "ping",
            &Listener::new(move |event| {
                let target = event.target_as::<Node>().unwrap();
                let current = event.current_target_as::<Node>().unwrap();
                log.push(format!("{name}: {} @ {}", target.name(), current.name()));
            }),
        );
    }

    leaf.dispatch_event_with("ping", true, None);

    assert_eq!(log.names(), ["leaf: leaf @ leaf", "root: leaf @ root"]);
}

#[test]
fn test_payload_reaches_every_listener_kind() {
    let log = CallLog::new();
    let [root, leaf] = chain(["root", "leaf"]);
    root.dispatcher().add_event_listener(
        "score",
        &Listener::with_data({
            let log = log.clone();
            move |_, data| {
                let points = data.and_then(|d| d.downcast_ref::<u32>()).copied();
                log.push(format!("root: {points:?}"));
            }
        }),
    );
    leaf.dispatcher().add_event_listener(
        "score",
        &Listener::new({
            let log = log.clone();
            move |event| log.push(format!("leaf: {:?}", event.data_as::<u32>().copied()))
        }),
    );

    leaf.dispatch_event_with("score", true, Some(std::rc::Rc::new(10u32)));

    assert_eq!(log.names(), ["leaf: Some(10)", "root: Some(10)"]);
}
