// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry configuration
//!
//! A registry is configured once at construction. Hosts that keep their
//! settings in TOML can embed a `[registry]`-style table and load it with
//! [`RegistryConfig::from_toml`] or [`RegistryConfig::load`].

use crate::error::EmitError;
use serde::Deserialize;
use std::path::Path;

/// What `publish` does when a callback panics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Let the panic unwind to the publisher, skipping the remaining callbacks
    #[default]
    Propagate,
    /// Catch the panic, log it, and keep dispatching
    Isolate,
}

/// Settings for a single [`Registry`](crate::Registry)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Name attached to every log line emitted by the registry
    pub label: String,
    pub failure_policy: FailurePolicy,
}

impl RegistryConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self, EmitError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, EmitError> {
        let content = std::fs::read_to_string(path).map_err(|source| EmitError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new("default")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
