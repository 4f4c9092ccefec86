// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Check-before-act idempotency, observed through the real filesystem.

use crate::prelude::*;

#[tokio::test]
async fn check_remediate_touches_once_across_two_runs() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("sink-marker");
    let marker = marker.to_string_lossy();

    let doc = host_doc(&format!(
        r#"[{{"name":"ensure marker","check":"test -f {marker}",
            "on_missing":[{{"name":"touch","command":"touch {marker}"}}]}}]"#
    ));

    // Run 1: marker absent, remediation fires, recheck passes.
    let (first, _) = run_on_host(&doc).await;
    assert!(first.success());
    assert_eq!(first.results[0].remediation.len(), 1);

    // Run 2: marker present, the check short-circuits.
    let (second, _) = run_on_host(&doc).await;
    assert!(second.success());
    assert_eq!(second.results[0].remediation.len(), 0);
}

#[tokio::test]
async fn remediation_that_cannot_satisfy_the_check_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("never-created");
    let missing = missing.to_string_lossy();

    let doc = host_doc(&format!(
        r#"[{{"check":"test -f {missing}",
            "on_missing":[{{"name":"noop","command":"true"}}]}}]"#
    ));
    let (report, _) = run_on_host(&doc).await;
    assert!(!report.success());
    let error = report.results[0].error.as_deref().unwrap();
    assert!(error.contains("check still fails"), "{}", error);
    // The remediation itself succeeded and stays attached.
    assert_eq!(report.results[0].remediation.len(), 1);
    assert!(report.results[0].remediation[0].succeeded());
}

#[tokio::test]
async fn dry_run_executes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("dry-marker");
    let marker_str = marker.to_string_lossy();

    let doc = host_doc(&format!(
        r#"[{{"name":"would touch","command":"touch {marker_str}"}}]"#
    ));
    let options = sink_engine::RunOptions {
        os: Some(sink_core::Os::current()),
        dry_run: true,
        ..sink_engine::RunOptions::default()
    };
    let report = sink_engine::run_document(
        &doc,
        std::sync::Arc::new(sink_shell::LocalTransport::new()),
        options,
    )
    .await
    .unwrap();

    assert!(report.success());
    assert_eq!(report.results[0].status, sink_core::StepStatus::Skipped);
    assert!(!marker.exists());
}
