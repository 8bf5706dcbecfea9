// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the registry

use crate::subscription::SubscriptionId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while subscribing, dispatching or configuring
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("event name must not be empty")]
    EmptyName,
    #[error("callback {subscription} for event {event} panicked: {message}")]
    CallbackPanicked {
        event: String,
        subscription: SubscriptionId,
        message: String,
    },
    #[error("missing argument at index {0}")]
    MissingArg(usize),
    #[error("invalid argument at index {index}: {source}")]
    Payload {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
