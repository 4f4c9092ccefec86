// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install steps: a sealed set of four variants
//!
//! Discrimination is structural over the raw object's keys, first match
//! wins:
//!
//! ```text
//! has "command"                 → Command
//! has "check" and "on_missing"  → CheckRemediate
//! has "check" and "error"       → CheckError
//! has "error" (without "check") → ErrorOnly
//! otherwise                     → decode failure
//! ```
//!
//! A shape carrying both `command` and `check` therefore decodes as a
//! Command step (row order), and an ambiguous shape is rejected at decode
//! time rather than coerced.

use crate::duration::{DurationSpec, TimeoutSpec};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Retry mode. `"until"` polls once per second until success or deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrySpec {
    Until,
}

/// Run a command, optionally polling until it succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub command: String,
    /// Progress message shown while the step runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Custom error reported on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetrySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutSpec>,
    /// Pause after the command succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<DurationSpec>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub verbose: bool,
}

/// Run a check command; report the configured error when it exits non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckErrorStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub check: String,
    pub error: String,
}

/// Run a check command; when it fails, run remediation sub-steps, then
/// re-run the check to confirm the condition now holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRemediateStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub check: String,
    pub on_missing: Vec<RemediationStep>,
}

/// Always fails with the declared error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorOnlyStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub error: String,
}

/// One remediation sub-step: same semantics as a Command step, but no
/// check and no nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationStep {
    pub name: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetrySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<DurationSpec>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub verbose: bool,
}

/// A single install step, exactly one of four shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Command(CommandStep),
    CheckError(CheckErrorStep),
    CheckRemediate(CheckRemediateStep),
    ErrorOnly(ErrorOnlyStep),
}

impl Step {
    /// Wire tag for verbose event payloads.
    pub fn step_type(&self) -> &'static str {
        match self {
            Step::Command(_) => "command",
            Step::CheckError(_) => "check_error",
            Step::CheckRemediate(_) => "check_remediate",
            Step::ErrorOnly(_) => "error",
        }
    }

    /// Name shown in events: the explicit name when present, else a
    /// variant-appropriate fallback.
    pub fn display_name(&self) -> String {
        match self {
            Step::Command(s) => s
                .name
                .clone()
                .or_else(|| s.message.clone())
                .unwrap_or_else(|| s.command.clone()),
            Step::CheckError(s) => s.name.clone().unwrap_or_else(|| s.check.clone()),
            Step::CheckRemediate(s) => s.name.clone().unwrap_or_else(|| s.check.clone()),
            Step::ErrorOnly(s) => s.name.clone().unwrap_or_else(|| "error".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::deserialize(deserializer)?;

        // Decision table; first match wins.
        let step = if raw.contains_key("command") {
            CommandStep::deserialize(Value::Object(raw)).map(Step::Command)
        } else if raw.contains_key("check") && raw.contains_key("on_missing") {
            CheckRemediateStep::deserialize(Value::Object(raw)).map(Step::CheckRemediate)
        } else if raw.contains_key("check") && raw.contains_key("error") {
            CheckErrorStep::deserialize(Value::Object(raw)).map(Step::CheckError)
        } else if raw.contains_key("error") {
            ErrorOnlyStep::deserialize(Value::Object(raw)).map(Step::ErrorOnly)
        } else {
            return Err(de::Error::custom("unable to determine step variant"));
        };
        step.map_err(de::Error::custom)
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Step::Command(s) => s.serialize(serializer),
            Step::CheckError(s) => s.serialize(serializer),
            Step::CheckRemediate(s) => s.serialize(serializer),
            Step::ErrorOnly(s) => s.serialize(serializer),
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
