// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription records and invocation budgets

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked on every matching publish
pub type Callback<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

/// Per-registry sequential identifier, used in logs and errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// How many more times a subscription may fire. Only invocations that
/// return normally count against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    Unbounded,
    Remaining(u64),
}

impl Budget {
    /// `0` means "no cap", matching an omitted count
    pub fn from_max(max_invocations: u64) -> Self {
        if max_invocations == 0 {
            Budget::Unbounded
        } else {
            Budget::Remaining(max_invocations)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Budget::Remaining(0))
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Unbounded => write!(f, "unbounded"),
            Budget::Remaining(n) => write!(f, "{}", n),
        }
    }
}

/// Result of taking one invocation from a budget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Claim {
    /// Invoke; more invocations remain
    Granted,
    /// Invoke; this was the final one
    Last,
    /// Budget already spent, do not invoke
    Exhausted,
}

/// One registered interest in an event
///
/// Equality is identity: two subscriptions with the same name, callback and
/// budget are still different subscriptions.
pub struct Subscription<A, R> {
    id: SubscriptionId,
    name: String,
    callback: Callback<A, R>,
    /// `None` when unbounded
    remaining: Option<AtomicU64>,
}

impl<A, R> Subscription<A, R> {
    pub(crate) fn new(
        id: SubscriptionId,
        name: String,
        callback: Callback<A, R>,
        budget: Budget,
    ) -> Self {
        let remaining = match budget {
            Budget::Unbounded => None,
            Budget::Remaining(n) => Some(AtomicU64::new(n)),
        };
        Self {
            id,
            name,
            callback,
            remaining,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remaining(&self) -> Budget {
        match &self.remaining {
            None => Budget::Unbounded,
            Some(n) => Budget::Remaining(n.load(Ordering::SeqCst)),
        }
    }

    /// Atomically take one invocation from the budget
    pub(crate) fn claim(&self) -> Claim {
        let Some(counter) = &self.remaining else {
            return Claim::Granted;
        };
        match counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)) {
            Ok(1) => Claim::Last,
            Ok(_) => Claim::Granted,
            Err(_) => Claim::Exhausted,
        }
    }

    /// Hand back a claimed invocation whose callback did not complete
    pub(crate) fn refund(&self) {
        if let Some(counter) = &self.remaining {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn invoke(&self, args: &A) -> R {
        (self.callback)(args)
    }
}

impl<A, R> PartialEq for Subscription<A, R> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<A, R> Eq for Subscription<A, R> {}

impl<A, R> fmt::Debug for Subscription<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

/// Everything needed to create a subscription, in one record
pub struct SubscribeOptions<A, R> {
    pub name: String,
    pub callback: Callback<A, R>,
    /// `None` or `Some(0)` subscribe without a cap
    pub max_invocations: Option<u64>,
}

impl<A, R> SubscribeOptions<A, R> {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
            max_invocations: None,
        }
    }

    /// Remove the subscription automatically after `n` invocations
    pub fn max_invocations(mut self, n: u64) -> Self {
        self.max_invocations = Some(n);
        self
    }

    pub fn budget(&self) -> Budget {
        Budget::from_max(self.max_invocations.unwrap_or(0))
    }
}

impl<A, R> Clone for SubscribeOptions<A, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            callback: Arc::clone(&self.callback),
            max_invocations: self.max_invocations,
        }
    }
}

impl<A, R> fmt::Debug for SubscribeOptions<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscribeOptions")
            .field("name", &self.name)
            .field("max_invocations", &self.max_invocations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
