// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal happy path and fact interpolation, end to end.

use crate::prelude::*;
use sink_core::StepStatus;

#[tokio::test]
async fn minimal_happy_path_emits_running_then_success() {
    let doc = host_doc(r#"[{"name":"hello","command":"echo hi"}]"#);
    let (report, events) = run_on_host(&doc).await;

    assert!(report.success());
    assert_eq!(report.summary(), "1 succeeded, 0 failed");
    assert!(report.results[0].output.as_deref().unwrap().contains("hi"));

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].status, StepStatus::Running);
    assert_eq!(events[0].step, "hello");
    assert_eq!(events[1].status, StepStatus::Success);
}

#[tokio::test]
async fn gathered_fact_substitutes_into_commands() {
    let doc = parse(&format!(
        r#"{{"version":"1.0",
            "facts":{{"arch":{{"command":"echo x86_64","transform":{{"x86_64":"amd64"}}}}}},
            "platforms":[{{"os":"{}","match":".*","name":"Host",
                "install_steps":[{{"name":"print","command":"echo {{{{.arch}}}}"}}]}}]}}"#,
        host_os()
    ));
    let (report, _) = run_on_host(&doc).await;
    assert!(report.success());
    assert!(report.results[0]
        .output
        .as_deref()
        .unwrap()
        .contains("amd64"));
}

#[tokio::test]
async fn first_failure_stops_the_platform() {
    let doc = host_doc(
        r#"[{"name":"ok","command":"true"},
            {"name":"bad","command":"false"},
            {"name":"never","command":"echo unreachable"}]"#,
    );
    let (report, events) = run_on_host(&doc).await;

    assert!(!report.success());
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.summary(), "1 succeeded, 1 failed");
    // Terminal event of step N precedes any event of step N+1, and the
    // stopped step never appears.
    let steps: Vec<&str> = events.iter().map(|e| e.step.as_str()).collect();
    assert_eq!(steps, ["ok", "ok", "bad", "bad"]);
}

#[tokio::test]
async fn check_error_step_reports_configured_message() {
    let doc = host_doc(r#"[{"check":"exit 1","error":"precondition unmet"}]"#);
    let (report, _) = run_on_host(&doc).await;
    assert!(!report.success());
    assert!(report.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("precondition unmet"));
}

#[tokio::test]
async fn context_is_stable_across_events() {
    let doc = host_doc(r#"[{"command":"true"},{"command":"true"}]"#);
    let (_, events) = run_on_host(&doc).await;
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.context == events[0].context));
    assert!(events.iter().all(|e| e.run_id == events[0].run_id));
    assert_eq!(events[0].context.transport, "local");
    assert!(!events[0].context.host.is_empty());
}
