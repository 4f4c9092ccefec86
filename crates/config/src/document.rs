// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration document model

use crate::duration::{DurationSpec, TimeoutSpec};
use crate::step::Step;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// Declared type of a gathered fact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactType {
    String,
    Boolean,
    Integer,
}

/// A fact to gather at the start of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactDef {
    /// Shell command whose trimmed stdout becomes the fact value
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Environment variable name for `export` output, e.g. `TARGET_ARCH`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,
    /// Gather only on these platforms; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub fact_type: Option<FactType>,
    /// Value rewrite table applied to the trimmed stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<IndexMap<String, String>>,
    /// Fail (or skip) when the value is missing from the transform table
    #[serde(default, skip_serializing_if = "is_false")]
    pub strict: bool,
    /// Abort the whole run when this fact cannot be gathered
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub verbose: bool,
    /// Pause after the fact is gathered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<DurationSpec>,
    /// Process-level deadline for the fact command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutSpec>,
}

/// Steps for one Linux distribution family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionDef {
    /// `/etc/os-release` ID values this entry matches, e.g. `ubuntu`
    pub ids: Vec<String>,
    pub name: String,
    pub install_steps: Vec<Step>,
}

/// Installation recipe for one operating system.
///
/// Carries either `install_steps` directly or a list of
/// per-distribution step lists, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    /// Target OS: `darwin`, `linux`, or `windows`
    pub os: String,
    /// Reserved match pattern, currently informational
    #[serde(rename = "match")]
    pub match_pattern: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install_steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distributions: Vec<DistributionDef>,
    /// Error message reported when a step on this platform fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Root of a configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Schema version of the document, e.g. `"1.0"`
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Facts to gather before any step runs, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub facts: IndexMap<String, FactDef>,
    pub platforms: Vec<PlatformDef>,
    /// Seed values for the facts mapping; gathered values overwrite
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub defaults: IndexMap<String, String>,
    /// Fallback error message reported when a run fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Document {
    /// Find the first platform declared for the given OS identifier.
    pub fn platform_for(&self, os: &str) -> Option<&PlatformDef> {
        self.platforms.iter().find(|p| p.os == os)
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
