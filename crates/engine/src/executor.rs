// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step execution
//!
//! One step at a time, strictly in declaration order. Each step emits a
//! `running` event, does its work through the transport, and emits one
//! terminal event. Dry runs visit every step but never launch a command.

use serde::Serialize;
use sink_config::{
    interpolate, CheckErrorStep, CheckRemediateStep, CommandStep, DurationSpec, ErrorOnlyStep,
    RemediationStep, RetrySpec, Step, TimeoutSpec,
};
use sink_core::{
    format_elapsed, now_ms, EventCallback, ExecutionContext, ExecutionEvent, Facts,
    RemediationMeta, RunId, StepStatus, VerboseMeta,
};
use sink_shell::{CommandOutput, Transport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Fixed interval between retry probes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Retry deadline when `retry = "until"` is set without a timeout.
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(60);

/// Terminal outcome of one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// The command after fact interpolation, when one was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Remediation sub-step outcomes, in execution order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remediation: Vec<StepResult>,
}

impl StepResult {
    fn new(name: impl Into<String>, status: StepStatus) -> Self {
        Self {
            name: name.into(),
            status,
            output: None,
            error: None,
            exit_code: None,
            command: None,
            remediation: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, StepStatus::Success | StepStatus::Skipped)
    }
}

/// Outcome of running one command (single shot or retry loop).
struct CommandOutcome {
    success: bool,
    output: Option<String>,
    error: Option<String>,
    exit_code: Option<i32>,
}

impl CommandOutcome {
    fn into_result(self, name: String, command: String) -> StepResult {
        StepResult {
            name,
            status: if self.success {
                StepStatus::Success
            } else {
                StepStatus::Failed
            },
            output: self.output,
            error: self.error,
            exit_code: self.exit_code,
            command: Some(command),
            remediation: Vec::new(),
        }
    }
}

/// Executes install steps through a transport.
///
/// Construction captures the execution context (five shell queries) and
/// allocates the run identifier; both stay stable for the executor's
/// lifetime and are attached to every event.
pub struct StepExecutor {
    transport: Arc<dyn Transport>,
    dry_run: bool,
    verbose: bool,
    json: bool,
    run_id: RunId,
    context: ExecutionContext,
    on_event: Option<EventCallback>,
    cancel: Arc<AtomicBool>,
}

impl StepExecutor {
    pub async fn new(transport: Arc<dyn Transport>) -> Self {
        let context = discover_context(transport.as_ref()).await;
        Self {
            transport,
            dry_run: false,
            verbose: false,
            json: false,
            run_id: RunId::generate(),
            context,
            on_event: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Visit every step but execute no commands.
    pub fn with_dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    /// Attach verbose metadata to events and emit `[VERBOSE]` stderr lines.
    pub fn with_verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    /// Attach verbose metadata to events (payload richness only).
    pub fn with_json(mut self, on: bool) -> Self {
        self.json = on;
        self
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    /// Cancellation flag checked between retry probes.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Execute steps in order, stopping at the first failure.
    ///
    /// The returned list covers only attempted steps, so its length is at
    /// most the number of steps.
    pub async fn execute_steps(&self, steps: &[Step], facts: &Facts) -> Vec<StepResult> {
        let mut results = Vec::new();
        for step in steps {
            let result = self.execute_step(step, facts).await;
            let failed = result.status == StepStatus::Failed;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    /// Execute a single step: `running` event, variant dispatch, terminal
    /// event.
    pub async fn execute_step(&self, step: &Step, facts: &Facts) -> StepResult {
        let name = step.display_name();
        self.emit(&name, StepStatus::Running, None, None, None);

        if self.dry_run {
            let result = StepResult::new(&name, StepStatus::Skipped);
            self.emit(
                &name,
                StepStatus::Skipped,
                None,
                None,
                self.meta_for(step, &result),
            );
            return result;
        }

        let verbose_step = self.verbose || step_verbose(step);
        if verbose_step {
            eprintln!("[VERBOSE] step '{}' ({})", name, step.step_type());
        }

        let result = match step {
            Step::Command(s) => self.run_command_step(&name, s, facts).await,
            Step::CheckError(s) => self.run_check_error(&name, s, facts).await,
            Step::CheckRemediate(s) => self.run_check_remediate(&name, s, facts).await,
            Step::ErrorOnly(s) => self.run_error_only(&name, s),
        };

        if verbose_step {
            match &result.error {
                Some(error) => eprintln!("[VERBOSE] step '{}' failed: {}", name, error),
                None => eprintln!("[VERBOSE] step '{}' succeeded", name),
            }
        }

        self.emit(
            &name,
            result.status,
            result.output.clone(),
            result.error.clone(),
            self.meta_for(step, &result),
        );
        result
    }

    async fn run_command_step(
        &self,
        name: &str,
        step: &CommandStep,
        facts: &Facts,
    ) -> StepResult {
        let command = match interpolate(&step.command, facts) {
            Ok(command) => command,
            Err(e) => return template_failure(name, e),
        };
        let outcome = match step.retry {
            Some(RetrySpec::Until) => {
                self.run_until(
                    &command,
                    step.timeout.as_ref(),
                    step.sleep,
                    step.error.as_deref(),
                )
                .await
            }
            None => self.run_once(&command, step.sleep, step.error.as_deref()).await,
        };
        outcome.into_result(name.to_string(), command)
    }

    async fn run_check_error(
        &self,
        name: &str,
        step: &CheckErrorStep,
        facts: &Facts,
    ) -> StepResult {
        let check = match interpolate(&step.check, facts) {
            Ok(check) => check,
            Err(e) => return template_failure(name, e),
        };
        let out = self.transport.run(&check).await;
        let mut result = if out.ok() {
            let mut r = StepResult::new(name, StepStatus::Success);
            r.output = non_empty(out.stdout);
            r.exit_code = Some(0);
            r
        } else {
            let mut r = StepResult::new(name, StepStatus::Failed);
            r.error = Some(compose_failure(Some(&step.error), &out));
            r.exit_code = Some(out.exit_code);
            r
        };
        result.command = Some(check);
        result
    }

    async fn run_check_remediate(
        &self,
        name: &str,
        step: &CheckRemediateStep,
        facts: &Facts,
    ) -> StepResult {
        let check = match interpolate(&step.check, facts) {
            Ok(check) => check,
            Err(e) => return template_failure(name, e),
        };

        let out = self.transport.run(&check).await;
        if out.ok() {
            let mut result = StepResult::new(name, StepStatus::Success);
            result.output = non_empty(out.stdout);
            result.exit_code = Some(0);
            result.command = Some(check);
            return result;
        }
        tracing::info!(step = %name, check = %check, "check failed; remediating");

        let mut remediation = Vec::new();
        for sub in &step.on_missing {
            let sub_result = self.run_remediation(sub, facts).await;
            let failed = !sub_result.succeeded();
            let error = sub_result.error.clone();
            remediation.push(sub_result);
            if failed {
                let mut result = StepResult::new(name, StepStatus::Failed);
                result.error = Some(format!(
                    "remediation step '{}' failed: {}",
                    sub.name,
                    error.unwrap_or_else(|| "unknown error".to_string())
                ));
                result.command = Some(check);
                result.remediation = remediation;
                return result;
            }
        }

        // Recheck: remediation only counts when the checked condition now
        // holds. Single invocation; the outer step's retry does not apply.
        let recheck = self.transport.run(&check).await;
        let mut result = if recheck.ok() {
            let mut r = StepResult::new(name, StepStatus::Success);
            r.output = non_empty(recheck.stdout);
            r.exit_code = Some(0);
            r
        } else {
            let mut r = StepResult::new(name, StepStatus::Failed);
            r.error = Some(format!(
                "remediation completed but check still fails: {}",
                recheck.summary()
            ));
            r.exit_code = Some(recheck.exit_code);
            r
        };
        result.command = Some(check);
        result.remediation = remediation;
        result
    }

    fn run_error_only(&self, name: &str, step: &ErrorOnlyStep) -> StepResult {
        let mut result = StepResult::new(name, StepStatus::Failed);
        result.error = Some(step.error.clone());
        result
    }

    async fn run_remediation(&self, sub: &RemediationStep, facts: &Facts) -> StepResult {
        let command = match interpolate(&sub.command, facts) {
            Ok(command) => command,
            Err(e) => return template_failure(&sub.name, e),
        };
        let outcome = match sub.retry {
            Some(RetrySpec::Until) => {
                self.run_until(
                    &command,
                    sub.timeout.as_ref(),
                    sub.sleep,
                    sub.error.as_deref(),
                )
                .await
            }
            None => self.run_once(&command, sub.sleep, sub.error.as_deref()).await,
        };
        outcome.into_result(sub.name.clone(), command)
    }

    /// Single-shot command execution with post-success sleep.
    async fn run_once(
        &self,
        command: &str,
        sleep: Option<DurationSpec>,
        custom_error: Option<&str>,
    ) -> CommandOutcome {
        let out = self.transport.run(command).await;
        if out.ok() {
            self.pause(sleep).await;
            CommandOutcome {
                success: true,
                output: non_empty(out.stdout),
                error: None,
                exit_code: Some(0),
            }
        } else {
            let error = compose_failure(custom_error, &out);
            CommandOutcome {
                success: false,
                output: non_empty(out.stdout),
                error: Some(error),
                exit_code: Some(out.exit_code),
            }
        }
    }

    /// Poll the command once per second until it exits 0 or the deadline
    /// passes. At least one attempt is always made, even with a zero
    /// timeout.
    async fn run_until(
        &self,
        command: &str,
        timeout: Option<&TimeoutSpec>,
        sleep: Option<DurationSpec>,
        custom_error: Option<&str>,
    ) -> CommandOutcome {
        let deadline = timeout
            .map(|t| t.interval.duration())
            .unwrap_or(DEFAULT_RETRY_TIMEOUT);
        let override_code = timeout.and_then(|t| t.error_code);
        let start = Instant::now();
        let mut last = CommandOutput::exit(-1, "");
        let mut cancelled = false;

        loop {
            let out = self.transport.run(command).await;
            if out.ok() {
                let elapsed = start.elapsed().as_secs();
                self.pause(sleep).await;
                let mut output = format!("Ready after {}", format_elapsed(elapsed));
                let stdout = out.stdout.trim();
                if !stdout.is_empty() {
                    output.push('\n');
                    output.push_str(stdout);
                }
                return CommandOutcome {
                    success: true,
                    output: Some(output),
                    error: None,
                    exit_code: Some(0),
                };
            }
            last = out;
            if start.elapsed() >= deadline {
                break;
            }
            if self.cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        let elapsed = format_elapsed(start.elapsed().as_secs());
        let exit_code = override_code.unwrap_or(last.exit_code);
        let base = if cancelled {
            format!("Cancelled after {}\nLast error: {}", elapsed, last.summary())
        } else {
            format!("Timeout after {}\nLast error: {}", elapsed, last.summary())
        };
        let error = match custom_error {
            Some(custom) => format!("{}\n{}", custom, base),
            None => base,
        };
        CommandOutcome {
            success: false,
            output: None,
            error: Some(error),
            exit_code: Some(exit_code),
        }
    }

    async fn pause(&self, sleep: Option<DurationSpec>) {
        if let Some(spec) = sleep {
            tokio::time::sleep(spec.duration()).await;
        }
    }

    fn emit(
        &self,
        step: &str,
        status: StepStatus,
        output: Option<String>,
        error: Option<String>,
        verbose: Option<VerboseMeta>,
    ) {
        if let Some(callback) = &self.on_event {
            let event = ExecutionEvent {
                timestamp_ms: now_ms(),
                run_id: self.run_id.clone(),
                step: step.to_string(),
                status,
                output,
                error,
                context: self.context.clone(),
                verbose,
                dry_run: self.dry_run,
            };
            callback(&event);
        }
    }

    /// Build verbose metadata for terminal events when verbose or JSON
    /// mode is on.
    fn meta_for(&self, step: &Step, result: &StepResult) -> Option<VerboseMeta> {
        if !self.verbose && !self.json && !step_verbose(step) {
            return None;
        }
        let mut meta = VerboseMeta {
            step_type: step.step_type().to_string(),
            command: result.command.clone(),
            exit_code: result.exit_code,
            stdout: result.output.clone(),
            ..VerboseMeta::default()
        };
        if let Step::Command(s) = step {
            meta.message = s.message.clone();
            meta.retry = s.retry.map(|_| "until".to_string());
            meta.timeout = s.timeout.map(|t| t.interval.to_string());
            meta.sleep = s.sleep.map(|d| d.to_string());
        }
        meta.remediation = result
            .remediation
            .iter()
            .map(|r| RemediationMeta {
                name: r.name.clone(),
                status: r.status,
                exit_code: r.exit_code,
            })
            .collect();
        Some(meta)
    }
}

fn step_verbose(step: &Step) -> bool {
    match step {
        Step::Command(s) => s.verbose,
        _ => false,
    }
}

fn template_failure(name: &str, error: sink_config::TemplateError) -> StepResult {
    let mut result = StepResult::new(name, StepStatus::Failed);
    result.error = Some(format!("template error: {}", error));
    result
}

fn compose_failure(custom: Option<&str>, out: &CommandOutput) -> String {
    match custom {
        Some(message) => format!("{} ({})", message, out.summary()),
        None => out.summary(),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Capture the execution context with five shell queries.
///
/// Failed queries leave their field empty rather than aborting
/// construction.
pub(crate) async fn discover_context(transport: &dyn Transport) -> ExecutionContext {
    ExecutionContext {
        host: query(transport, "hostname").await,
        user: query(transport, "whoami").await,
        cwd: query(transport, "pwd").await,
        os: query(transport, "uname -s").await,
        arch: query(transport, "uname -m").await,
        transport: transport.tag().to_string(),
        timestamp_ms: now_ms(),
    }
}

async fn query(transport: &dyn Transport, command: &str) -> String {
    let out = transport.run(command).await;
    if out.ok() {
        out.stdout.trim().to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
