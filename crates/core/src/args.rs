// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic event payloads
//!
//! The default [`Registry`](crate::Registry) forwards an ordered list of JSON
//! values to every callback. Nothing ties an event name to the shape of its
//! arguments, so callbacks read them back with [`Args::get_as`] and handle
//! mismatches themselves. Hosts that want compile-time checking use a
//! registry parametrised with a concrete payload type instead.

use crate::error::EmitError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Positional arguments forwarded by `publish`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Append any serializable value
    pub fn push_serialized<T: Serialize>(&mut self, value: &T) -> Result<(), EmitError> {
        let index = self.0.len();
        let value =
            serde_json::to_value(value).map_err(|source| EmitError::Payload { index, source })?;
        self.0.push(value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Deserialize the argument at `index` into `T`
    pub fn get_as<T: DeserializeOwned>(&self, index: usize) -> Result<T, EmitError> {
        let value = self.0.get(index).ok_or(EmitError::MissingArg(index))?;
        T::deserialize(value).map_err(|source| EmitError::Payload { index, source })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build [`Args`] from expressions convertible into `serde_json::Value`
///
/// ```
/// let args = herald_core::args![1, "two", true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::from(vec![$($crate::Value::from($value)),+])
    };
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
