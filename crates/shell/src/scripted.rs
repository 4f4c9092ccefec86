// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted transport fake for testing

use crate::{CommandOutput, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct Script {
    responses: Vec<CommandOutput>,
    cursor: usize,
}

impl Script {
    /// Next canned response; the last one repeats once the script is
    /// exhausted.
    fn next(&mut self) -> Option<CommandOutput> {
        let response = self.responses.get(self.cursor).cloned();
        if self.cursor + 1 < self.responses.len() {
            self.cursor += 1;
        }
        response
    }
}

struct ScriptedState {
    scripts: HashMap<String, Script>,
    calls: Vec<String>,
}

/// Transport fake returning canned responses per command string.
///
/// Commands without a script succeed with empty output. Multiple
/// responses registered for the same command are returned in order, the
/// last repeating forever (handy for retry loops). Every invocation is
/// recorded for assertions.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedState>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedState {
                scripts: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next response for `command`.
    pub fn respond(&self, command: impl Into<String>, output: CommandOutput) -> &Self {
        let mut state = self.inner.lock();
        state
            .scripts
            .entry(command.into())
            .or_insert_with(|| Script {
                responses: Vec::new(),
                cursor: 0,
            })
            .responses
            .push(output);
        self
    }

    /// Register a successful response with the given stdout.
    pub fn respond_ok(&self, command: impl Into<String>, stdout: impl Into<String>) -> &Self {
        self.respond(command, CommandOutput::success(stdout))
    }

    /// Register a non-zero exit with the given stderr.
    pub fn respond_exit(
        &self,
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> &Self {
        self.respond(command, CommandOutput::exit(exit_code, stderr))
    }

    /// Register a spawn failure (exit code 127).
    pub fn fail_spawn(&self, command: impl Into<String>, message: impl Into<String>) -> &Self {
        self.respond(
            command,
            CommandOutput::spawn_failure(message, crate::SPAWN_FAILURE_EXIT_CODE),
        )
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    /// How many times `command` has been run.
    pub fn call_count(&self, command: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.as_str() == command)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn run(&self, command: &str) -> CommandOutput {
        let mut state = self.inner.lock();
        state.calls.push(command.to_string());
        state
            .scripts
            .get_mut(command)
            .and_then(Script::next)
            .unwrap_or_else(|| CommandOutput::success(""))
    }

    fn tag(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
#[path = "scripted_tests.rs"]
mod tests;
