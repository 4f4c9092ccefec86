// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operating system identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// An operating system the engine can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// The OS the process is currently running on.
    pub fn current() -> Os {
        match std::env::consts::OS {
            "macos" => Os::Darwin,
            "windows" => Os::Windows,
            _ => Os::Linux,
        }
    }

    /// Wire identifier: `darwin`, `linux`, or `windows`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    /// Parse a wire identifier. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Os> {
        match s {
            "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "os_tests.rs"]
mod tests;
