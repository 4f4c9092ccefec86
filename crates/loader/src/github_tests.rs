// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    semver_tag   = { "v1.2.3", PinKind::Tag, true, false },
    semver_pre   = { "v2.0.0-rc.1", PinKind::Tag, true, false },
    full_sha     = { "a1b2c3d4e5f67890abcdef1234567890abcdef12", PinKind::Commit, true, false },
    short_sha    = { "a1b2c3d", PinKind::ShortCommit, true, false },
    main_branch  = { "main", PinKind::Branch, false, true },
    master       = { "master", PinKind::Branch, false, true },
    trunk        = { "trunk", PinKind::Branch, false, true },
    feature      = { "feature/new-thing", PinKind::Unknown, false, false },
    bare_word    = { "latest", PinKind::Unknown, false, false },
)]
fn classifies_raw_refs(ref_name: &str, pin: PinKind, pinned: bool, mutable: bool) {
    let url = format!(
        "https://raw.githubusercontent.com/owner/repo/{}/config.json",
        ref_name
    );
    let source = classify(&url).unwrap();
    assert_eq!(source.pin, pin);
    assert_eq!(source.pinned, pinned);
    assert_eq!(source.mutable, mutable);
    assert_eq!(source.owner, "owner");
    assert_eq!(source.repo, "repo");
    assert_eq!(source.ref_name, ref_name);
}

#[test]
fn release_download_is_pinned() {
    let source = classify("https://github.com/o/r/releases/download/v1/f.json").unwrap();
    assert_eq!(source.pin, PinKind::Release);
    assert!(source.pinned);
    assert!(!source.mutable);
    assert_eq!(source.ref_name, "v1");
}

#[test]
fn ref_rules_apply_in_order() {
    // 40 hex characters are a full commit, not a short one.
    let sha = "0123456789abcdef0123456789abcdef01234567";
    let url = format!("https://raw.githubusercontent.com/o/r/{}/f.json", sha);
    assert_eq!(classify(&url).unwrap().pin, PinKind::Commit);
}

#[yare::parameterized(
    plain_site     = { "https://example.com/config.json" },
    github_blob    = { "https://github.com/o/r/blob/main/f.json" },
    too_few_parts  = { "https://raw.githubusercontent.com/o/r" },
    raw_no_file    = { "https://raw.githubusercontent.com/o/r/main" },
    empty_segment  = { "https://raw.githubusercontent.com//r/main/f.json" },
)]
fn non_github_sources_are_not_classified(url: &str) {
    assert!(classify(url).is_none());
}

#[test]
fn http_scheme_is_also_recognized() {
    let source = classify("http://raw.githubusercontent.com/o/r/main/f.json").unwrap();
    assert_eq!(source.pin, PinKind::Branch);
}

#[test]
fn pin_kind_names() {
    assert_eq!(PinKind::Tag.as_str(), "tag");
    assert_eq!(PinKind::ShortCommit.as_str(), "short commit");
}
