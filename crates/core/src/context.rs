// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution context captured once per run

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Host details captured at executor construction and attached to every
/// emitted event. Fields left empty when the discovery query failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Hostname of the machine executing steps
    #[serde(default)]
    pub host: String,
    /// User the steps run as
    #[serde(default)]
    pub user: String,
    /// Working directory at executor construction
    #[serde(default)]
    pub cwd: String,
    /// Kernel name as reported by `uname -s`
    #[serde(default)]
    pub os: String,
    /// Machine architecture as reported by `uname -m`
    #[serde(default)]
    pub arch: String,
    /// Transport tag, `"local"` for the local-process transport
    #[serde(default)]
    pub transport: String,
    /// Capture time, milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp_ms: u64,
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
