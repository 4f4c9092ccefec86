// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration: gather facts, select a platform, execute its steps

use crate::executor::{StepExecutor, StepResult};
use crate::facts::{FactError, FactGatherer};
use crate::platform::{detect_distro_id, select_distribution, select_platform, SelectError};
use sink_config::{Document, Step};
use sink_core::{EventCallback, ExecutionContext, Os, RunId, StepStatus};
use sink_shell::Transport;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort a run before or during setup.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fact(#[from] FactError),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Knobs for a single run.
#[derive(Default)]
pub struct RunOptions {
    /// Target OS; defaults to the current host
    pub os: Option<Os>,
    /// Linux distribution id; defaults to `/etc/os-release` detection
    pub distro_id: Option<String>,
    pub dry_run: bool,
    pub verbose: bool,
    pub json: bool,
    pub on_event: Option<EventCallback>,
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Outcome of a whole run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub context: ExecutionContext,
    pub results: Vec<StepResult>,
    /// Platform or document fallback error, present when the run failed
    pub fallback_error: Option<String>,
}

impl RunReport {
    /// True when no attempted step failed.
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.status != StepStatus::Failed)
    }

    /// Aggregate summary line: `<successes> succeeded, <failures> failed`.
    pub fn summary(&self) -> String {
        let successes = self
            .results
            .iter()
            .filter(|r| r.status == StepStatus::Success)
            .count();
        let failures = self
            .results
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .count();
        format!("{} succeeded, {} failed", successes, failures)
    }
}

/// Run a validated document against the host.
///
/// Facts gather first; a required-fact failure aborts before any step.
/// The first failing step stops the run.
pub async fn run_document(
    doc: &Document,
    transport: Arc<dyn Transport>,
    options: RunOptions,
) -> Result<RunReport, RunError> {
    let os = options.os.unwrap_or_else(Os::current);
    tracing::info!(os = %os, dry_run = options.dry_run, "starting run");

    let gatherer = FactGatherer::new(Arc::clone(&transport), os);
    let facts = gatherer.gather(doc).await?;

    let platform = select_platform(doc, os)?;
    let steps: &[Step] = if platform.distributions.is_empty() {
        &platform.install_steps
    } else {
        let distro_id = match options.distro_id {
            Some(id) => id,
            None => detect_distro_id().unwrap_or_default(),
        };
        &select_distribution(platform, &distro_id)?.install_steps
    };

    let mut executor = StepExecutor::new(Arc::clone(&transport))
        .await
        .with_dry_run(options.dry_run)
        .with_verbose(options.verbose)
        .with_json(options.json);
    if let Some(callback) = options.on_event {
        executor = executor.with_event_callback(callback);
    }
    if let Some(flag) = options.cancel {
        executor = executor.with_cancel_flag(flag);
    }

    let results = executor.execute_steps(steps, &facts).await;
    let failed = results.iter().any(|r| r.status == StepStatus::Failed);
    let fallback_error = if failed {
        platform.fallback.clone().or_else(|| doc.error.clone())
    } else {
        None
    };

    let report = RunReport {
        run_id: executor.run_id().clone(),
        context: executor.context().clone(),
        results,
        fallback_error,
    };
    tracing::info!(summary = %report.summary(), success = report.success(), "run finished");
    Ok(report)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
