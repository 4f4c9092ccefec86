// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform and distribution selection
//!
//! First exact match wins; there is no fuzzy, regex, or priority
//! ordering. Linux platforms that carry distributions are narrowed by
//! the `ID=` value of `/etc/os-release`.

use sink_config::{DistributionDef, Document, PlatformDef};
use sink_core::Os;
use thiserror::Error;

/// Where Linux distribution identity lives.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// No platform or distribution matched the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no matching platform for os '{os}'")]
    NoMatchingPlatform { os: String },

    #[error("no matching distribution for id '{id}' on platform '{platform}'")]
    NoMatchingDistribution { platform: String, id: String },
}

/// Find the first platform declared for the target OS.
pub fn select_platform(doc: &Document, os: Os) -> Result<&PlatformDef, SelectError> {
    doc.platform_for(os.as_str())
        .ok_or_else(|| SelectError::NoMatchingPlatform { os: os.to_string() })
}

/// Find the first distribution whose id list contains `distro_id`.
pub fn select_distribution<'a>(
    platform: &'a PlatformDef,
    distro_id: &str,
) -> Result<&'a DistributionDef, SelectError> {
    platform
        .distributions
        .iter()
        .find(|d| d.ids.iter().any(|id| id == distro_id))
        .ok_or_else(|| SelectError::NoMatchingDistribution {
            platform: platform.name.clone(),
            id: distro_id.to_string(),
        })
}

/// Extract the `ID=` value from `/etc/os-release`-style content.
///
/// Values may be quoted (`ID="ubuntu"`); quotes are stripped.
pub fn parse_os_release(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("ID=")?;
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// Read the current distribution id from [`OS_RELEASE_PATH`].
pub fn detect_distro_id() -> Option<String> {
    let content = std::fs::read_to_string(OS_RELEASE_PATH).ok()?;
    parse_os_release(&content)
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
