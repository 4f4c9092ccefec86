// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local subprocess transport

use crate::{CommandOutput, Transport, SPAWN_FAILURE_EXIT_CODE};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs commands as local child processes through the host shell.
///
/// Shell selection happens once at construction: `/bin/bash` if present,
/// else `/bin/sh`, else `sh` resolved via PATH. Windows hosts use
/// `cmd /C`. The command string is always passed through the
/// interpreter's "run this string" flag so arbitrary shell syntax works.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    shell: PathBuf,
    flag: &'static str,
    env: Option<Vec<(String, String)>>,
    cwd: Option<PathBuf>,
}

impl LocalTransport {
    pub fn new() -> Self {
        let (shell, flag) = select_shell();
        Self {
            shell,
            flag,
            env: None,
            cwd: None,
        }
    }

    /// Replace the child's complete environment.
    ///
    /// Without this, children inherit the parent environment.
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = Some(env);
        self
    }

    /// Set the child's working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Path of the selected shell interpreter.
    pub fn shell(&self) -> &Path {
        &self.shell
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn select_shell() -> (PathBuf, &'static str) {
    for candidate in ["/bin/bash", "/bin/sh"] {
        let path = Path::new(candidate);
        if path.exists() {
            return (path.to_path_buf(), "-c");
        }
    }
    (PathBuf::from("sh"), "-c")
}

#[cfg(windows)]
fn select_shell() -> (PathBuf, &'static str) {
    (PathBuf::from("cmd"), "/C")
}

#[async_trait]
impl Transport for LocalTransport {
    async fn run(&self, command: &str) -> CommandOutput {
        let mut cmd = Command::new(&self.shell);
        cmd.arg(self.flag).arg(command).kill_on_drop(true);
        if let Some(env) = &self.env {
            cmd.env_clear();
            cmd.envs(env.iter().cloned());
        }
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        match cmd.output().await {
            Ok(output) => {
                let exit_code = output.status.code().unwrap_or(-1);
                tracing::debug!(%command, exit_code, "command finished");
                CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code,
                    failure: None,
                }
            }
            Err(io_err) => {
                tracing::warn!(%command, error = %io_err, "failed to spawn command");
                CommandOutput::spawn_failure(io_err.to_string(), SPAWN_FAILURE_EXIT_CODE)
            }
        }
    }

    fn tag(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
