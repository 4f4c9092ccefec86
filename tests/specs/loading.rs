// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-source policy and GitHub pin classification, end to end.

use sink_loader::{classify, load_source, LoadError, PinKind};
use std::io::Write;
use std::time::Instant;

#[test]
fn github_pin_classification_table() {
    let cases = [
        (
            "https://raw.githubusercontent.com/o/r/v1.2.3/f.json",
            PinKind::Tag,
            true,
            false,
        ),
        (
            "https://raw.githubusercontent.com/o/r/main/f.json",
            PinKind::Branch,
            false,
            true,
        ),
        (
            "https://raw.githubusercontent.com/o/r/a1b2c3d4e5f67890abcdef1234567890abcdef12/f.json",
            PinKind::Commit,
            true,
            false,
        ),
        (
            "https://github.com/o/r/releases/download/v1/f.json",
            PinKind::Release,
            true,
            false,
        ),
    ];
    for (url, pin, pinned, mutable) in cases {
        let source = classify(url).unwrap_or_else(|| panic!("unclassified: {url}"));
        assert_eq!(source.pin, pin, "{url}");
        assert_eq!(source.pinned, pinned, "{url}");
        assert_eq!(source.mutable, mutable, "{url}");
    }
}

#[test]
fn http_without_checksum_is_rejected_without_network_io() {
    let start = Instant::now();
    let err = load_source("http://example.com/c.json", None, false).unwrap_err();
    assert!(matches!(err, LoadError::InvalidSource(_)));
    // A network attempt would block far longer than the policy check.
    assert!(start.elapsed().as_millis() < 100);
}

#[test]
fn local_file_loads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(
        br#"{"version":"1.0","platforms":[{"os":"linux","match":".*","name":"L",
            "install_steps":[{"name":"hello","command":"echo hi"}]}]}"#,
    )
    .unwrap();

    let doc = load_source(&path.to_string_lossy(), None, false).unwrap();
    assert_eq!(doc.version, "1.0");
    assert_eq!(doc.platforms[0].install_steps.len(), 1);
}
