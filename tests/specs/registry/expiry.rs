//! Invocation budget specs
//!
//! Verify counted subscriptions expire and uncounted ones do not.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn ping_fires_twice_then_disappears() {
    let registry = registry();
    let calls = Calls::new();
    let handle = registry.subscribe_n("ping", calls.callback("f"), 2).unwrap();

    assert_eq!(registry.publish("ping", Args::new()), tags(&["f"]));
    assert_eq!(handle.remaining(), Budget::Remaining(1));
    assert_eq!(registry.publish("ping", Args::new()), tags(&["f"]));
    assert_eq!(registry.publish("ping", Args::new()), None);

    assert_eq!(calls.take(), names(&["f", "f"]));
    assert!(!registry.contains("ping"));
}

#[test]
fn uncounted_subscription_fires_indefinitely() {
    let registry = registry();
    let calls = Calls::new();
    registry.subscribe("tick", calls.callback("t")).unwrap();

    for _ in 0..100 {
        registry.publish("tick", Args::new());
    }

    assert_eq!(calls.take().len(), 100);
    assert!(registry.contains("tick"));
}

#[test]
fn expired_name_behaves_like_never_registered() {
    let registry = registry();
    registry
        .subscribe_n("once", |_: &Args| Value::Null, 1)
        .unwrap();
    registry.publish("once", Args::new());

    assert_eq!(registry.publish("once", Args::new()), registry.publish("never", Args::new()));
    assert!(registry.event_names().is_empty());
}
