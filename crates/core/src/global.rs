// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide default registry
//!
//! Created on first use and kept for the life of the process. Code that
//! needs isolation (tests, plugins) should construct its own [`Registry`].

use crate::args::Args;
use crate::config::RegistryConfig;
use crate::error::EmitError;
use crate::registry::{Registry, SubscriptionHandle};
use crate::subscription::Subscription;
use serde_json::Value;
use std::sync::LazyLock;

static GLOBAL: LazyLock<Registry> =
    LazyLock::new(|| Registry::with_config(RegistryConfig::new("global")));

/// The shared default registry
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// [`Registry::subscribe`] on the default registry
pub fn subscribe<F>(name: impl Into<String>, callback: F) -> Result<SubscriptionHandle, EmitError>
where
    F: Fn(&Args) -> Value + Send + Sync + 'static,
{
    GLOBAL.subscribe(name, callback)
}

/// [`Registry::subscribe_n`] on the default registry
pub fn subscribe_n<F>(
    name: impl Into<String>,
    callback: F,
    max_invocations: u64,
) -> Result<SubscriptionHandle, EmitError>
where
    F: Fn(&Args) -> Value + Send + Sync + 'static,
{
    GLOBAL.subscribe_n(name, callback, max_invocations)
}

/// [`Registry::unsubscribe`] on the default registry
pub fn unsubscribe(subscription: &Subscription<Args, Value>) -> bool {
    GLOBAL.unsubscribe(subscription)
}

/// [`Registry::publish`] on the default registry
pub fn publish(name: &str, args: Args) -> Option<Vec<Value>> {
    GLOBAL.publish(name, args)
}

#[cfg(test)]
#[path = "global_tests.rs"]
mod tests;
