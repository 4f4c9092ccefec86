// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sink-shell: Process transport
//!
//! Runs a single shell command string and captures its stdout, stderr,
//! and exit code. A non-zero exit is not a transport failure; only the
//! inability to launch the child is.

mod local;
mod output;
#[cfg(any(test, feature = "test-support"))]
mod scripted;

pub use local::LocalTransport;
pub use output::CommandOutput;
#[cfg(any(test, feature = "test-support"))]
pub use scripted::ScriptedTransport;

use async_trait::async_trait;
use std::time::Duration;

/// Exit code synthesized when the child could not be spawned.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Exit code synthesized when a command deadline expires.
pub const DEADLINE_EXIT_CODE: i32 = 124;

/// Runs shell command strings.
///
/// The single operation the engine depends on. Implementations always
/// hand the string to an interpreter with a "run this string" flag so
/// pipes, redirections, and `$VAR` expansion work.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run `command` to completion and capture its output.
    async fn run(&self, command: &str) -> CommandOutput;

    /// Short tag identifying this transport in execution contexts.
    fn tag(&self) -> &'static str;
}

/// Run a command with an overall deadline.
///
/// Wraps the transport call in `tokio::time::timeout`; expiry synthesizes
/// a timed-out [`CommandOutput`] with exit code 124. The local transport
/// spawns children with kill-on-drop, so an expired command does not
/// linger.
pub async fn run_with_deadline(
    transport: &dyn Transport,
    command: &str,
    deadline: Duration,
) -> CommandOutput {
    match tokio::time::timeout(deadline, transport.run(command)).await {
        Ok(output) => output,
        Err(_elapsed) => CommandOutput::spawn_failure(
            format!("timed out after {}s", deadline.as_secs()),
            DEADLINE_EXIT_CODE,
        ),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
