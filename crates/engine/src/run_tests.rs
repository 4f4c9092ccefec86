// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sink_config::parse_document;
use sink_shell::ScriptedTransport;

fn doc(json: &str) -> Document {
    parse_document(json).unwrap()
}

fn options(os: Os) -> RunOptions {
    RunOptions {
        os: Some(os),
        ..RunOptions::default()
    }
}

const LINUX_DOC: &str = r#"{"version":"1.0",
  "facts":{"arch":{"command":"detect-arch","transform":{"x86_64":"amd64"}}},
  "platforms":[
    {"os":"darwin","match":".*","name":"macOS","install_steps":[{"command":"brew install jq"}]},
    {"os":"linux","match":".*","name":"Linux","install_steps":[
      {"name":"install","command":"apt-get install -y jq-{{arch}}"}]}],
  "error":"install failed; see https://example.com/help"}"#;

#[tokio::test]
async fn happy_path_gathers_selects_and_executes() {
    let transport = ScriptedTransport::new();
    transport.respond_ok("detect-arch", "x86_64\n");
    transport.respond_ok("apt-get install -y jq-amd64", "done\n");
    let report = run_document(&doc(LINUX_DOC), Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    assert!(report.success());
    assert_eq!(report.summary(), "1 succeeded, 0 failed");
    assert_eq!(report.results[0].command.as_deref(), Some("apt-get install -y jq-amd64"));
    assert!(report.fallback_error.is_none());
}

#[tokio::test]
async fn os_override_picks_the_other_platform() {
    let transport = ScriptedTransport::new();
    transport.respond_ok("detect-arch", "arm64\n");
    let report = run_document(&doc(LINUX_DOC), Arc::new(transport.clone()), options(Os::Darwin))
        .await
        .unwrap();
    assert!(report.success());
    assert_eq!(transport.call_count("brew install jq"), 1);
}

#[tokio::test]
async fn failed_step_attaches_document_fallback_error() {
    let transport = ScriptedTransport::new();
    transport.respond_ok("detect-arch", "x86_64\n");
    transport.respond_exit("apt-get install -y jq-amd64", 100, "E: broken");
    let report = run_document(&doc(LINUX_DOC), Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    assert!(!report.success());
    assert_eq!(report.summary(), "0 succeeded, 1 failed");
    assert_eq!(
        report.fallback_error.as_deref(),
        Some("install failed; see https://example.com/help")
    );
}

#[tokio::test]
async fn platform_fallback_takes_precedence_over_document_error() {
    let transport = ScriptedTransport::new();
    transport.respond_exit("fail", 1, "");
    let json = r#"{"version":"1.0","platforms":[
        {"os":"linux","match":".*","name":"L","fallback":"platform-specific help",
         "install_steps":[{"command":"fail"}]}],
        "error":"generic help"}"#;
    let report = run_document(&doc(json), Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    assert_eq!(report.fallback_error.as_deref(), Some("platform-specific help"));
}

#[tokio::test]
async fn required_fact_failure_aborts_before_any_step() {
    let transport = ScriptedTransport::new();
    transport.respond_exit("detect-arch", 1, "no uname");
    let json = r#"{"version":"1.0",
        "facts":{"arch":{"command":"detect-arch","required":true}},
        "platforms":[{"os":"linux","match":".*","name":"L",
            "install_steps":[{"command":"never-runs"}]}]}"#;
    let err = run_document(&doc(json), Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Fact(_)));
    assert_eq!(transport.call_count("never-runs"), 0);
}

#[tokio::test]
async fn missing_platform_is_a_selection_error() {
    let transport = ScriptedTransport::new();
    let json = r#"{"version":"1.0","platforms":[{"os":"darwin","match":".*","name":"Mac",
        "install_steps":[{"command":"true"}]}]}"#;
    let err = run_document(&doc(json), Arc::new(transport), options(Os::Windows))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Select(SelectError::NoMatchingPlatform { .. })
    ));
}

#[tokio::test]
async fn distribution_steps_selected_by_id() {
    let transport = ScriptedTransport::new();
    transport.respond_ok("apk add jq", "");
    let json = r#"{"version":"1.0","platforms":[{"os":"linux","match":".*","name":"Linux",
        "distributions":[
          {"ids":["ubuntu"],"name":"Ubuntu","install_steps":[{"command":"apt-get install -y jq"}]},
          {"ids":["alpine"],"name":"Alpine","install_steps":[{"command":"apk add jq"}]}]}]}"#;
    let report = run_document(
        &doc(json),
        Arc::new(transport.clone()),
        RunOptions {
            os: Some(Os::Linux),
            distro_id: Some("alpine".to_string()),
            ..RunOptions::default()
        },
    )
    .await
    .unwrap();
    assert!(report.success());
    assert_eq!(transport.call_count("apk add jq"), 1);
    assert_eq!(transport.call_count("apt-get install -y jq"), 0);
}

#[tokio::test]
async fn unknown_distribution_is_a_selection_error() {
    let transport = ScriptedTransport::new();
    let json = r#"{"version":"1.0","platforms":[{"os":"linux","match":".*","name":"Linux",
        "distributions":[{"ids":["ubuntu"],"name":"Ubuntu",
            "install_steps":[{"command":"true"}]}]}]}"#;
    let err = run_document(
        &doc(json),
        Arc::new(transport),
        RunOptions {
            os: Some(Os::Linux),
            distro_id: Some("gentoo".to_string()),
            ..RunOptions::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        RunError::Select(SelectError::NoMatchingDistribution { .. })
    ));
}

#[tokio::test]
async fn dry_run_reports_skipped_steps_as_success() {
    let transport = ScriptedTransport::new();
    let report = run_document(
        &doc(LINUX_DOC),
        Arc::new(transport.clone()),
        RunOptions {
            os: Some(Os::Linux),
            dry_run: true,
            ..RunOptions::default()
        },
    )
    .await
    .unwrap();
    assert!(report.success());
    assert_eq!(report.results[0].status, StepStatus::Skipped);
    // Facts still gather during a dry run; install commands never do.
    assert_eq!(transport.call_count("detect-arch"), 1);
    assert_eq!(transport.call_count("apt-get install -y jq-amd64"), 0);
}

#[tokio::test]
async fn idempotent_second_run_performs_no_remediation() {
    let transport = ScriptedTransport::new();
    transport
        .respond_exit("test -f /tmp/sink-marker", 1, "")
        .respond_ok("test -f /tmp/sink-marker", "");
    transport.respond_ok("touch /tmp/sink-marker", "");
    let json = r#"{"version":"1.0","platforms":[{"os":"linux","match":".*","name":"L",
        "install_steps":[{"check":"test -f /tmp/sink-marker",
            "on_missing":[{"name":"t","command":"touch /tmp/sink-marker"}]}]}]}"#;
    let document = doc(json);

    let first = run_document(&document, Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    assert!(first.success());
    assert_eq!(first.results[0].remediation.len(), 1);

    // Second run: the check is satisfied, so the remediation never fires.
    let second = run_document(&document, Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    assert!(second.success());
    assert_eq!(second.results[0].remediation.len(), 0);
    assert_eq!(transport.call_count("touch /tmp/sink-marker"), 1);
}

#[tokio::test]
async fn run_ids_differ_between_runs() {
    let transport = ScriptedTransport::new();
    let a = run_document(&doc(LINUX_DOC), Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    let b = run_document(&doc(LINUX_DOC), Arc::new(transport.clone()), options(Os::Linux))
        .await
        .unwrap();
    assert_ne!(a.run_id, b.run_id);
}
