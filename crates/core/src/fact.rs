// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gathered fact values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value produced by gathering a fact: a string, boolean, or integer.
///
/// Serializes untagged, so the JSON event stream carries the natural
/// representation (`"amd64"`, `true`, `8`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl FactValue {
    /// String slice view for string facts.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FactValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Str(s) => f.write_str(s),
            FactValue::Bool(b) => write!(f, "{}", b),
            FactValue::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Str(s.to_string())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Str(s)
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

impl From<i64> for FactValue {
    fn from(n: i64) -> Self {
        FactValue::Int(n)
    }
}

/// The facts mapping: fact name → gathered value, in declaration order.
///
/// Written exclusively during gathering; read-only during step execution.
pub type Facts = IndexMap<String, FactValue>;

#[cfg(test)]
#[path = "fact_tests.rs"]
mod tests;
