//! Shared helpers for behavioral specs

pub use herald_core::{args, Args, Budget, Registry, SubscriptionHandle, Value};
pub use similar_asserts::assert_eq;
use std::sync::{Arc, Mutex};

/// Records which callbacks ran, in order
#[derive(Clone, Default)]
pub struct Calls {
    seen: Arc<Mutex<Vec<String>>>,
}

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records `tag` and returns it as a JSON string
    pub fn callback(&self, tag: &str) -> impl Fn(&Args) -> Value + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        let tag = tag.to_string();
        move |_: &Args| {
            seen.lock().unwrap().push(tag.clone());
            Value::from(tag.clone())
        }
    }

    pub fn record(&self, tag: &str) {
        self.seen.lock().unwrap().push(tag.to_string());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

/// Owned tags, as `Calls::take` returns them
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| t.to_string()).collect()
}

/// Tags as publish would return them
pub fn tags(items: &[&str]) -> Option<Vec<Value>> {
    Some(items.iter().map(|t| Value::from(*t)).collect())
}

pub fn registry() -> Registry {
    Registry::new()
}
