// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry-until-ready polling against the real clock.

use crate::prelude::*;
use std::time::Instant;

#[tokio::test]
async fn retry_until_timeout_with_custom_exit_code() {
    let doc = host_doc(
        r#"[{"name":"wait","command":"false","retry":"until",
            "timeout":{"interval":"2s","error_code":124}}]"#,
    );
    let start = Instant::now();
    let (report, _) = run_on_host(&doc).await;
    let elapsed = start.elapsed();

    assert!(!report.success());
    let result = &report.results[0];
    assert_eq!(result.exit_code, Some(124));
    let error = result.error.as_deref().unwrap();
    assert!(error.contains("Timeout after 2s"), "{}", error);
    assert!(error.contains("Last error: exit code 1"), "{}", error);
    // Deadline honored: at least the interval, at most interval + one
    // poll sleep plus scheduling slack.
    assert!(elapsed.as_secs_f64() >= 2.0, "{:?}", elapsed);
    assert!(elapsed.as_secs_f64() < 4.5, "{:?}", elapsed);
}

#[tokio::test]
async fn retry_succeeds_once_condition_is_met() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("ready");
    let flag = flag.to_string_lossy();

    // First probe creates the flag and fails; the second finds it.
    let doc = host_doc(&format!(
        r#"[{{"name":"wait","command":"test -f {flag} || {{ touch {flag}; false; }}",
            "retry":"until","timeout":"30s"}}]"#
    ));
    let (report, _) = run_on_host(&doc).await;
    assert!(report.success());
    let output = report.results[0].output.as_deref().unwrap();
    assert!(output.starts_with("Ready after"), "{}", output);
}
