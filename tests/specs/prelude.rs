// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for behavioral specifications.

#![allow(dead_code)]

use sink_config::Document;
use sink_core::{ExecutionEvent, Os};
use sink_engine::{run_document, RunOptions, RunReport};
use sink_shell::LocalTransport;
use std::sync::{Arc, Mutex};

/// Parse a document, panicking with the validation message on failure.
pub fn parse(json: &str) -> Document {
    sink_config::parse_document(json).unwrap()
}

/// The current host's wire identifier, for building host-matching docs.
pub fn host_os() -> &'static str {
    Os::current().as_str()
}

/// A single-platform document for the current host with the given steps.
pub fn host_doc(steps_json: &str) -> Document {
    parse(&format!(
        r#"{{"version":"1.0","platforms":[{{"os":"{}","match":".*","name":"Host",
            "install_steps":{}}}]}}"#,
        host_os(),
        steps_json
    ))
}

/// Run a document through the real local transport, capturing events.
pub async fn run_on_host(doc: &Document) -> (RunReport, Vec<ExecutionEvent>) {
    let events: Arc<Mutex<Vec<ExecutionEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = RunOptions {
        os: Some(Os::current()),
        on_event: Some(Box::new(move |event: &ExecutionEvent| {
            sink.lock().unwrap().push(event.clone());
        })),
        ..RunOptions::default()
    };
    let report = run_document(doc, Arc::new(LocalTransport::new()), options)
        .await
        .unwrap();
    let events = events.lock().unwrap().clone();
    (report, events)
}
