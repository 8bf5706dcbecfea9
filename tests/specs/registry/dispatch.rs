//! Publish dispatch specs
//!
//! Verify ordering, payload forwarding, and isolation between names.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn publish_runs_subscribers_in_registration_order() {
    let registry = registry();
    let calls = Calls::new();
    for tag in ["s1", "s2", "s3", "s4"] {
        registry.subscribe("order", calls.callback(tag)).unwrap();
    }

    assert_eq!(registry.publish("order", Args::new()), tags(&["s1", "s2", "s3", "s4"]));
    assert_eq!(calls.take(), names(&["s1", "s2", "s3", "s4"]));
}

#[test]
fn publish_never_registered_invokes_nothing() {
    let registry = registry();
    let calls = Calls::new();
    registry.subscribe("other", calls.callback("other")).unwrap();

    assert_eq!(registry.publish("never-registered", Args::new()), None);
    assert!(calls.take().is_empty());
}

#[test]
fn publish_forwards_every_argument() {
    let registry = registry();
    registry
        .subscribe("greet", |args: &Args| {
            let name: String = args.get_as(0).unwrap();
            let times: usize = args.get_as(1).unwrap();
            Value::from(format!("hello {}", name).repeat(times))
        })
        .unwrap();

    assert_eq!(
        registry.publish("greet", args!["ana", 2]),
        Some(vec![Value::from("hello anahello ana")])
    );
}

#[test]
fn zero_argument_publish_is_fine() {
    let registry = registry();
    registry
        .subscribe("count", |args: &Args| Value::from(args.len()))
        .unwrap();

    assert_eq!(registry.publish("count", args![]), Some(vec![Value::from(0)]));
}

#[test]
fn names_do_not_interfere() {
    let registry = registry();
    let calls = Calls::new();
    let a = registry.subscribe("a", calls.callback("a")).unwrap();
    registry.subscribe("b", calls.callback("b")).unwrap();

    registry.publish("a", Args::new());
    a.unsubscribe();
    registry.publish("a", Args::new());
    registry.publish("b", Args::new());

    assert_eq!(calls.take(), names(&["a", "b"]));
    assert_eq!(registry.event_names(), names(&["b"]));
}

#[test]
fn typed_registry_checks_payload_at_compile_time() {
    let registry: Registry<(u32, String), bool> = Registry::new();
    registry
        .subscribe("login", |(attempts, user): &(u32, String)| {
            *attempts < 3 && !user.is_empty()
        })
        .unwrap();

    assert_eq!(registry.publish("login", (1, "ana".into())), Some(vec![true]));
    assert_eq!(registry.publish("login", (5, "ana".into())), Some(vec![false]));
}
