// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution events emitted by the step executor
//!
//! Events form a lazy, strictly ordered stream: a step's `running` event
//! always precedes its terminal event, which always precedes the next
//! step's `running`. Consumers may serialize each event as a JSON object
//! for machine consumption.

use crate::context::ExecutionContext;
use crate::id::RunId;
use serde::{Deserialize, Serialize};

/// Status of a step at the time an event is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Running,
    Success,
    Skipped,
    Failed,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepStatus::Running)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Extra payload attached to events when verbose or JSON mode is on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerboseMeta {
    /// Step variant: `command`, `check_error`, `check_remediate`, or `error`
    pub step_type: String,
    /// The command after fact interpolation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Retry mode, `"until"` when polling is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<String>,
    /// Formatted timeout interval, e.g. `"2m"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Formatted post-success sleep, e.g. `"5s"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remediation: Vec<RemediationMeta>,
}

/// Outcome of one remediation sub-step, for verbose payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationMeta {
    pub name: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// One entry in the execution event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    /// Emission time, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    pub run_id: RunId,
    /// Display name of the step this event belongs to
    pub step: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub context: ExecutionContext,
    /// Present only in verbose or JSON mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<VerboseMeta>,
    /// Whether this run is a dry run
    #[serde(default, skip_serializing_if = "is_false")]
    pub dry_run: bool,
}

/// Synchronous event consumer invoked by the executor.
///
/// Called from the executing task; consumers that forward events to other
/// threads are responsible for their own synchronization.
pub type EventCallback = Box<dyn Fn(&ExecutionEvent) + Send + Sync>;

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
