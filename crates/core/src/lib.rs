// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! herald-core: in-process publish/subscribe by event name
//!
//! This crate provides:
//! - `Registry` - subscribe callbacks to names, publish payloads to them
//! - `SubscriptionHandle` - remove one subscription without a registry reference
//! - `Args` - dynamically typed payloads for the default registry
//! - A lazily created process-wide registry (`global()`)
//!
//! Dispatch is synchronous, in registration order, over a snapshot of the
//! subscribers taken when `publish` starts.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod args;
pub mod config;
pub mod error;
pub mod global;
pub mod registry;
pub mod subscription;

// Re-exports
pub use args::Args;
pub use config::{FailurePolicy, RegistryConfig};
pub use error::EmitError;
pub use global::{global, publish, subscribe, subscribe_n, unsubscribe};
pub use registry::{Registry, SubscriptionHandle};
pub use serde_json::Value;
pub use subscription::{Budget, Callback, SubscribeOptions, Subscription, SubscriptionId};
