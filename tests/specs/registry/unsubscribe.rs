//! Unsubscribe specs
//!
//! Verify handles remove exactly their own subscription.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn unsubscribed_handler_is_skipped() {
    let registry = registry();
    let calls = Calls::new();
    registry.subscribe("x", calls.callback("f")).unwrap();
    let g = registry.subscribe("x", calls.callback("g")).unwrap();

    g.unsubscribe();

    assert_eq!(registry.publish("x", Args::new()), tags(&["f"]));
    assert_eq!(calls.take(), names(&["f"]));
}

#[test]
fn unsubscribe_twice_is_harmless() {
    let registry = registry();
    let calls = Calls::new();
    registry.subscribe("x", calls.callback("f")).unwrap();
    let g = registry.subscribe("x", calls.callback("g")).unwrap();

    assert!(g.unsubscribe());
    assert!(!g.unsubscribe());
    assert!(!registry.unsubscribe(g.subscription()));

    assert_eq!(registry.subscriber_count("x"), 1);
}

#[test]
fn last_unsubscribe_clears_the_name() {
    let registry = registry();
    let only = registry.subscribe("x", |_: &Args| Value::Null).unwrap();

    only.unsubscribe();

    assert!(!registry.contains("x"));
    assert_eq!(registry.publish("x", Args::new()), None);
}
