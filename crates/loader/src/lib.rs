// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sink-loader: Remote configuration loading
//!
//! Fetches a configuration document over HTTPS, HTTP, or from a local
//! path, enforcing the transport policy: plain HTTP needs a checksum or
//! an explicit opt-out, HTTPS GitHub sources get a best-effort sidecar
//! checksum, and any checksum in effect is verified before parsing.

pub mod github;

pub use github::{classify, GitHubSource, PinKind};

use sha2::{Digest, Sha256};
use sink_config::{parse_document, Document, ParseError};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Overall timeout for fetching a configuration document.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the best-effort `<url>.sha256` sidecar fetch.
pub const CHECKSUM_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while loading a configuration source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport policy violation, e.g. plain HTTP without a checksum
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// Network failure or non-200 response
    #[error("transport error: {0}")]
    Transport(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Integrity { expected: String, actual: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Load a configuration document from a URL or local path.
///
/// `expected_sha256` pins the body's checksum; `skip_checksum` waives the
/// plain-HTTP policy. HTTPS without a checksum is accepted (TLS provides
/// authenticity).
pub fn load_source(
    source: &str,
    expected_sha256: Option<&str>,
    skip_checksum: bool,
) -> Result<Document, LoadError> {
    let checksum = expected_sha256
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if source.starts_with("http://") || source.starts_with("https://") {
        load_url(source, checksum, skip_checksum)
    } else {
        load_path(source, checksum)
    }
}

fn load_path(path: &str, checksum: Option<String>) -> Result<Document, LoadError> {
    let body = std::fs::read_to_string(Path::new(path)).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    if let Some(expected) = checksum {
        verify_checksum(&body, &expected)?;
    }
    Ok(parse_document(&body)?)
}

fn load_url(
    url: &str,
    mut checksum: Option<String>,
    skip_checksum: bool,
) -> Result<Document, LoadError> {
    let https = url.starts_with("https://");

    // Policy check happens before any network I/O.
    if !https && checksum.is_none() && !skip_checksum {
        return Err(LoadError::InvalidSource(
            "plain HTTP source requires a sha256 checksum or an explicit checksum opt-out"
                .to_string(),
        ));
    }

    let gh = github::classify(url);
    if let Some(source) = &gh {
        if source.mutable {
            tracing::warn!(
                reference = %source.ref_name,
                pin = source.pin.as_str(),
                "configuration tracks a mutable reference; content can change between runs"
            );
        }
    }

    // Best-effort sidecar checksum for HTTPS GitHub sources.
    if https && checksum.is_none() && !skip_checksum && gh.is_some() {
        let sidecar_url = format!("{}.sha256", url);
        match fetch_text(&sidecar_url, CHECKSUM_FETCH_TIMEOUT) {
            Ok(body) => {
                checksum = body.split_whitespace().next().map(str::to_string);
                tracing::info!(url = %sidecar_url, "adopted sidecar checksum");
            }
            Err(e) => {
                tracing::debug!(url = %sidecar_url, error = %e, "no sidecar checksum available");
            }
        }
    }

    let body = fetch_text(url, FETCH_TIMEOUT)?;
    if let Some(expected) = checksum {
        verify_checksum(&body, &expected)?;
    }
    Ok(parse_document(&body)?)
}

fn fetch_text(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let response = ureq::get(url)
        .timeout(timeout)
        .call()
        .map_err(|e| LoadError::Transport(e.to_string()))?;
    response
        .into_string()
        .map_err(|e| LoadError::Transport(format!("failed to read response body: {}", e)))
}

/// Compare the body's SHA-256 against the expected digest,
/// case-insensitively and whitespace-trimmed.
fn verify_checksum(body: &str, expected: &str) -> Result<(), LoadError> {
    let actual = format!("{:x}", Sha256::digest(body.as_bytes()));
    let expected = expected.trim();
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(LoadError::Integrity {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
