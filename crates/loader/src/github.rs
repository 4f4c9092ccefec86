// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub reference pin classification
//!
//! A remote configuration pinned to a tag, commit, or release cannot
//! silently change content; one tracking a branch can. The loader only
//! warns about mutable references, since tracking a branch can be a
//! deliberate choice.

use regex::Regex;
use std::sync::LazyLock;

// Allow expect here as the regexes are compile-time verified to be valid
#[allow(clippy::expect_used)]
static SEMVER_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v\d+\.\d+\.\d+(-[A-Za-z0-9.]+)?$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static FULL_SHA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static SHORT_SHA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,}$").expect("constant regex pattern is valid"));

/// Branch names recognized as mutable references.
const KNOWN_BRANCHES: &[&str] = &[
    "main",
    "master",
    "develop",
    "dev",
    "staging",
    "production",
    "trunk",
];

/// How a GitHub reference pins its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    /// Semver tag like `v1.2.3`
    Tag,
    /// Full 40-character commit SHA
    Commit,
    /// Abbreviated commit SHA (7+ hex characters)
    ShortCommit,
    /// Well-known branch name
    Branch,
    /// Release download asset
    Release,
    Unknown,
}

impl PinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinKind::Tag => "tag",
            PinKind::Commit => "commit",
            PinKind::ShortCommit => "short commit",
            PinKind::Branch => "branch",
            PinKind::Release => "release",
            PinKind::Unknown => "unknown",
        }
    }
}

/// A classified GitHub source reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSource {
    pub owner: String,
    pub repo: String,
    pub ref_name: String,
    pub pin: PinKind,
    /// Content cannot change under this reference
    pub pinned: bool,
    /// Content can silently change under this reference
    pub mutable: bool,
}

/// Classify a URL as a GitHub source reference.
///
/// Recognizes raw file URLs
/// (`raw.githubusercontent.com/<owner>/<repo>/<ref>/…`) and release
/// download URLs (`github.com/<owner>/<repo>/releases/download/<tag>/…`).
/// Returns `None` for anything else.
pub fn classify(url: &str) -> Option<GitHubSource> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    if let Some(path) = rest.strip_prefix("raw.githubusercontent.com/") {
        let segments: Vec<&str> = path.split('/').collect();
        // owner / repo / ref / at least one path segment
        if segments.len() < 4 || segments[..3].iter().any(|s| s.is_empty()) {
            return None;
        }
        let (pin, pinned, mutable) = classify_ref(segments[2]);
        return Some(GitHubSource {
            owner: segments[0].to_string(),
            repo: segments[1].to_string(),
            ref_name: segments[2].to_string(),
            pin,
            pinned,
            mutable,
        });
    }

    if let Some(path) = rest.strip_prefix("github.com/") {
        let segments: Vec<&str> = path.split('/').collect();
        // owner / repo / releases / download / tag / asset
        if segments.len() >= 6
            && segments[2] == "releases"
            && segments[3] == "download"
            && !segments[0].is_empty()
            && !segments[1].is_empty()
            && !segments[4].is_empty()
        {
            return Some(GitHubSource {
                owner: segments[0].to_string(),
                repo: segments[1].to_string(),
                ref_name: segments[4].to_string(),
                pin: PinKind::Release,
                pinned: true,
                mutable: false,
            });
        }
    }

    None
}

/// Classify a raw-URL ref. Ordered tests; first match wins.
fn classify_ref(ref_name: &str) -> (PinKind, bool, bool) {
    if SEMVER_TAG_PATTERN.is_match(ref_name) {
        (PinKind::Tag, true, false)
    } else if FULL_SHA_PATTERN.is_match(ref_name) {
        (PinKind::Commit, true, false)
    } else if SHORT_SHA_PATTERN.is_match(ref_name) {
        (PinKind::ShortCommit, true, false)
    } else if KNOWN_BRANCHES.contains(&ref_name) {
        (PinKind::Branch, false, true)
    } else {
        (PinKind::Unknown, false, false)
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
