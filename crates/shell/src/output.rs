// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Captured output of a transport invocation

use serde::{Deserialize, Serialize};

/// Result of running one shell command.
///
/// `failure` is set only when the child could not be launched (or a
/// deadline expired); a non-zero `exit_code` alone is a normal outcome
/// that callers inspect themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl CommandOutput {
    /// Successful capture with the given stdout and exit code 0.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Non-zero exit with the given stderr.
    pub fn exit(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            exit_code,
            ..Self::default()
        }
    }

    /// Spawn failure with a synthesized exit code.
    pub fn spawn_failure(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            exit_code,
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// True when the command launched and exited 0.
    pub fn ok(&self) -> bool {
        self.failure.is_none() && self.exit_code == 0
    }

    /// One-line failure summary: `exit code N`, with the spawn failure or
    /// trimmed stderr appended when present.
    pub fn summary(&self) -> String {
        let mut s = format!("exit code {}", self.exit_code);
        if let Some(failure) = &self.failure {
            s.push_str(": ");
            s.push_str(failure);
        } else {
            let stderr = self.stderr.trim();
            if !stderr.is_empty() {
                s.push_str(": ");
                s.push_str(stderr);
            }
        }
        s
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
