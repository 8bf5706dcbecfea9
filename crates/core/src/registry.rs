// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry routing published events to named subscriptions
//!
//! Dispatch is synchronous and runs on the publisher's thread. The registry
//! lock only guards the subscription map: `publish` copies the current
//! subscriber list, releases the lock, then invokes callbacks in
//! registration order. Callbacks may therefore subscribe, unsubscribe or
//! publish again without deadlocking, and changes they make only show up in
//! later publishes.

use crate::args::Args;
use crate::config::{FailurePolicy, RegistryConfig};
use crate::error::EmitError;
use crate::subscription::{Budget, Claim, SubscribeOptions, Subscription, SubscriptionId};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// Event name -> subscriptions in registration order. Never holds an empty list.
type SubscriptionMap<A, R> = HashMap<String, Vec<Arc<Subscription<A, R>>>>;

/// Named publish/subscribe registry
///
/// `A` is the payload handed to callbacks and `R` what they return. The
/// defaults give a dynamically typed registry; a typed one such as
/// `Registry<(u32, String), bool>` checks payloads at compile time.
///
/// Cloning shares state.
pub struct Registry<A = Args, R = Value> {
    inner: Arc<Inner<A, R>>,
}

struct Inner<A, R> {
    config: RegistryConfig,
    next_id: AtomicU64,
    subscriptions: RwLock<SubscriptionMap<A, R>>,
}

impl<A, R> Inner<A, R> {
    fn read(&self) -> RwLockReadGuard<'_, SubscriptionMap<A, R>> {
        self.subscriptions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SubscriptionMap<A, R>> {
        self.subscriptions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Remove exactly `subscription`, dropping the name once its list empties
    fn remove(&self, subscription: &Subscription<A, R>) -> bool {
        let removed = {
            let mut subs = self.write();
            let Some(list) = subs.get_mut(subscription.name()) else {
                return false;
            };
            let before = list.len();
            list.retain(|s| !std::ptr::eq(Arc::as_ptr(s), subscription));
            let removed = list.len() != before;
            if list.is_empty() {
                subs.remove(subscription.name());
            }
            removed
        };

        if removed {
            tracing::debug!(
                registry = %self.config.label,
                event = subscription.name(),
                subscription = %subscription.id(),
                "unsubscribed"
            );
        }
        removed
    }
}

impl<A, R> Registry<A, R> {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                next_id: AtomicU64::new(1),
                subscriptions: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Subscribe `callback` to `name` with no invocation cap
    pub fn subscribe<F>(
        &self,
        name: impl Into<String>,
        callback: F,
    ) -> Result<SubscriptionHandle<A, R>, EmitError>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        self.subscribe_with(SubscribeOptions::new(name, callback))
    }

    /// Subscribe `callback` to `name`, removing it after `max_invocations`
    /// dispatches. `0` means no cap.
    pub fn subscribe_n<F>(
        &self,
        name: impl Into<String>,
        callback: F,
        max_invocations: u64,
    ) -> Result<SubscriptionHandle<A, R>, EmitError>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        self.subscribe_with(SubscribeOptions::new(name, callback).max_invocations(max_invocations))
    }

    /// Append a subscription built from `options` to the end of its event's list
    pub fn subscribe_with(
        &self,
        options: SubscribeOptions<A, R>,
    ) -> Result<SubscriptionHandle<A, R>, EmitError> {
        if options.name.is_empty() {
            return Err(EmitError::EmptyName);
        }

        let budget = options.budget();
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let subscription = Arc::new(Subscription::new(
            id,
            options.name,
            options.callback,
            budget,
        ));

        self.inner
            .write()
            .entry(subscription.name().to_string())
            .or_default()
            .push(Arc::clone(&subscription));

        tracing::debug!(
            registry = %self.inner.config.label,
            event = subscription.name(),
            subscription = %id,
            %budget,
            "subscribed"
        );

        Ok(SubscriptionHandle {
            subscription,
            registry: Arc::downgrade(&self.inner),
        })
    }

    /// Remove `subscription` from its event. Unknown or already removed
    /// subscriptions are ignored; returns whether anything was removed.
    pub fn unsubscribe(&self, subscription: &Subscription<A, R>) -> bool {
        self.inner.remove(subscription)
    }

    /// Invoke every subscriber of `name` with `args`, in registration order
    ///
    /// Returns `None` when nothing is subscribed to `name`, otherwise the
    /// callbacks' return values in dispatch order. Under
    /// [`FailurePolicy::Propagate`] a panic reaches the caller and later
    /// subscribers are not invoked. Under [`FailurePolicy::Isolate`] a
    /// panicking callback is logged and contributes no value, so positions
    /// in the result no longer line up with subscriptions; use
    /// [`try_publish`](Self::try_publish) when they must.
    ///
    /// A panicking callback keeps its invocation: only calls that return
    /// count against a subscription's budget.
    pub fn publish(&self, name: &str, args: A) -> Option<Vec<R>> {
        let policy = self.inner.config.failure_policy;
        self.dispatch(name, &args, |sub, args| match policy {
            FailurePolicy::Propagate => Some(Self::invoke_propagating(sub, args)),
            FailurePolicy::Isolate => self.invoke_isolated(sub, args).ok(),
        })
    }

    /// Like [`publish`](Self::publish), but each callback runs in isolation
    /// and its outcome is reported in its own slot.
    pub fn try_publish(&self, name: &str, args: A) -> Option<Vec<Result<R, EmitError>>> {
        self.dispatch(name, &args, |sub, args| Some(self.invoke_isolated(sub, args)))
    }

    fn dispatch<T>(
        &self,
        name: &str,
        args: &A,
        mut call: impl FnMut(&Subscription<A, R>, &A) -> Option<T>,
    ) -> Option<Vec<T>> {
        // Callbacks must not observe subscriptions added or removed while
        // this dispatch is running, so iterate a copy taken up front.
        let Some(snapshot) = self.inner.read().get(name).cloned() else {
            tracing::trace!(registry = %self.inner.config.label, event = name, "no subscribers");
            return None;
        };

        let mut results = Vec::with_capacity(snapshot.len());
        for sub in &snapshot {
            // An exhausted member is left for whoever claimed its last
            // invocation: that caller either expires it or refunds the claim.
            let claim = sub.claim();
            if claim == Claim::Exhausted {
                continue;
            }

            tracing::trace!(
                registry = %self.inner.config.label,
                event = name,
                subscription = %sub.id(),
                "dispatching"
            );
            if let Some(value) = call(sub, args) {
                results.push(value);
            }

            if claim == Claim::Last && sub.remaining().is_exhausted() {
                self.expire(sub);
            }
        }
        Some(results)
    }

    fn expire(&self, sub: &Subscription<A, R>) {
        if self.inner.remove(sub) {
            tracing::debug!(
                registry = %self.inner.config.label,
                event = sub.name(),
                subscription = %sub.id(),
                "invocation budget spent"
            );
        }
    }

    fn invoke_propagating(sub: &Subscription<A, R>, args: &A) -> R {
        match std::panic::catch_unwind(AssertUnwindSafe(|| sub.invoke(args))) {
            Ok(value) => value,
            Err(payload) => {
                sub.refund();
                std::panic::resume_unwind(payload)
            }
        }
    }

    fn invoke_isolated(&self, sub: &Subscription<A, R>, args: &A) -> Result<R, EmitError> {
        std::panic::catch_unwind(AssertUnwindSafe(|| sub.invoke(args))).map_err(|payload| {
            sub.refund();
            let message = panic_message(payload.as_ref());
            tracing::error!(
                registry = %self.inner.config.label,
                event = sub.name(),
                subscription = %sub.id(),
                panic = %message,
                "callback panicked"
            );
            EmitError::CallbackPanicked {
                event: sub.name().to_string(),
                subscription: sub.id(),
                message,
            }
        })
    }

    /// Remove every subscription for `name`, returning how many there were
    pub fn clear_event(&self, name: &str) -> usize {
        let removed = self.inner.write().remove(name).map_or(0, |list| list.len());
        if removed > 0 {
            tracing::debug!(registry = %self.inner.config.label, event = name, removed, "event cleared");
        }
        removed
    }

    /// Remove every subscription, returning how many there were
    pub fn clear(&self) -> usize {
        let removed: usize = self.inner.write().drain().map(|(_, list)| list.len()).sum();
        tracing::debug!(registry = %self.inner.config.label, removed, "registry cleared");
        removed
    }

    /// Whether anything is subscribed to `name`
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.inner.read().get(name).map_or(0, Vec::len)
    }

    /// Current subscriptions for `name`, in dispatch order
    pub fn subscriptions(&self, name: &str) -> Vec<Arc<Subscription<A, R>>> {
        self.inner.read().get(name).cloned().unwrap_or_default()
    }

    /// Names with at least one subscription, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Total subscriptions across all names
    pub fn len(&self) -> usize {
        self.inner.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl<A, R> Default for Registry<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Clone for Registry<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for Registry<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.inner.config.label)
            .field("events", &self.event_names())
            .finish_non_exhaustive()
    }
}

/// Returned by `subscribe`; removes its own subscription on demand
///
/// Holds only a weak link to the registry, so storing a handle inside a
/// callback does not keep the registry alive.
pub struct SubscriptionHandle<A = Args, R = Value> {
    subscription: Arc<Subscription<A, R>>,
    registry: Weak<Inner<A, R>>,
}

impl<A, R> SubscriptionHandle<A, R> {
    pub fn subscription(&self) -> &Arc<Subscription<A, R>> {
        &self.subscription
    }

    pub fn id(&self) -> SubscriptionId {
        self.subscription.id()
    }

    pub fn remaining(&self) -> Budget {
        self.subscription.remaining()
    }

    /// Remove this subscription. Safe to call repeatedly, or after the
    /// registry is gone.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(inner) => inner.remove(&self.subscription),
            None => false,
        }
    }
}

impl<A, R> Clone for SubscriptionHandle<A, R> {
    fn clone(&self) -> Self {
        Self {
            subscription: Arc::clone(&self.subscription),
            registry: Weak::clone(&self.registry),
        }
    }
}

impl<A, R> fmt::Debug for SubscriptionHandle<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
